//! Filter, supply check and assignment for one randomizer run.

use anyhow::{bail, Context, Result};
use log::info;
use nexus_randomizer_core::{
    Args, CreditVisibility, FullAssignment, LevelId, NexusTemplate, RandomizerAssignment,
};
use nexus_randomizer_system_assignment::{
    affinity_randomize, assignment_fingerprint, atlas_randomize, ensure_supply, rng_from_label,
    stock_randomize, AtlasAssignConfig, StockDoorMode, AFFINITY_SLOTS,
};
use nexus_randomizer_system_filtering::{
    atlas_filter_levels, stock_filter_levels, AtlasFilterConfig, AtlasFilterInputs,
    StockFilterConfig,
};
use serde::Serialize;

use crate::{dataset::Dataset, settings::Kind};

/// Levels the filters let through, and how many the layout needs.
#[derive(Debug)]
pub(crate) struct Candidates {
    pub(crate) levels: Vec<LevelId>,
    pub(crate) needed: usize,
}

/// Runs the flavour's filter.
pub(crate) fn filter_candidates(
    kind: Kind,
    dataset: &Dataset,
    template: &NexusTemplate,
    args: &Args,
) -> Candidates {
    match kind {
        Kind::Atlas | Kind::Affinity => {
            let inputs = AtlasFilterInputs {
                catalog: &dataset.catalog,
                solvers: &dataset.solvers,
                banned: &dataset.banned,
                community: &dataset.community,
            };
            Candidates {
                levels: atlas_filter_levels(inputs, &AtlasFilterConfig::from_args(args)),
                needed: template.level_door_count(),
            }
        }
        Kind::Stock => Candidates {
            levels: stock_filter_levels(template, &StockFilterConfig::from_args(args)),
            needed: template.level_door_count(),
        },
    }
}

/// Template description echoed next to the assignment.
#[derive(Debug, Serialize)]
pub(crate) struct TemplateSummary {
    name: String,
    level_door_ids: Vec<u32>,
    level_door_names: Vec<String>,
}

impl TemplateSummary {
    fn of(template: &NexusTemplate) -> Self {
        Self {
            name: template.name().to_owned(),
            level_door_ids: template.level_door_ids().iter().map(|id| id.get()).collect(),
            level_door_names: template
                .level_slots()
                .iter()
                .map(|(_, slot)| slot.level.clone())
                .collect(),
        }
    }
}

/// JSON document printed by `generate`.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateReport {
    args: Args,
    hash: String,
    dataset_id: u64,
    template: TemplateSummary,
    #[serde(flatten)]
    assignment: RandomizerAssignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    full: Option<FullAssignment>,
}

/// Options of a single generation beyond the filter arguments.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GenerateRequest<'a> {
    pub(crate) kind: Kind,
    pub(crate) seed: &'a str,
    pub(crate) include_full: bool,
}

/// Generates and validates an assignment, refusing when too few levels match.
pub(crate) fn generate(
    request: GenerateRequest<'_>,
    dataset: &Dataset,
    template: &NexusTemplate,
    args: &Args,
) -> Result<GenerateReport> {
    let kind = request.kind;
    if kind == Kind::Affinity && template.level_door_count() != AFFINITY_SLOTS {
        bail!(
            "affinity layouts need a template with {AFFINITY_SLOTS} level doors, '{}' has {}",
            template.name(),
            template.level_door_count()
        );
    }

    let candidates = filter_candidates(kind, dataset, template, args);
    ensure_supply(&candidates.levels, candidates.needed)?;

    let mut rng = rng_from_label(request.seed);
    let assignment = match kind {
        Kind::Atlas => atlas_randomize(
            &mut rng,
            &candidates.levels,
            &dataset.rank_scores(),
            template,
            &AtlasAssignConfig::from_args(args),
        ),
        Kind::Stock => stock_randomize(
            &mut rng,
            &candidates.levels,
            template,
            StockDoorMode::from_args(args),
        ),
        Kind::Affinity => affinity_randomize(
            &mut rng,
            &candidates.levels,
            &dataset.rank_scores(),
            template,
            &dataset.catalog,
            &AtlasAssignConfig::from_args(args),
        ),
    };
    assignment
        .validate(template)
        .context("generated assignment does not fit the template")?;

    let hash = assignment_fingerprint(&assignment);
    info!("generated {} nexus {hash} with seed '{}'", kind.as_str(), request.seed);

    let full = if request.include_full {
        Some(assignment.with_other_doors(
            template,
            &dataset.catalog,
            CreditVisibility::from_args(args),
        )?)
    } else {
        None
    };
    let mut echoed = args.clone();
    let _ = echoed.insert("type".to_owned(), kind.as_str().to_owned());
    let _ = echoed.insert("seed".to_owned(), request.seed.to_owned());

    Ok(GenerateReport {
        args: echoed,
        hash,
        dataset_id: dataset.rank_gen_time(),
        template: TemplateSummary::of(template),
        assignment,
        full,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use nexus_randomizer_core::{LevelCatalog, LevelMeta, PlayerId, RankSnapshot, SolverMap};
    use nexus_randomizer_system_assignment::{historical_template, SupplyError};
    use nexus_randomizer_system_filtering::CommunityReachability;

    use super::*;

    fn dataset(levels: usize) -> Dataset {
        let mut catalog = LevelCatalog::new();
        let mut solvers = SolverMap::new();
        let mut snapshot = RankSnapshot::default();
        for index in 0..levels {
            let level = LevelId::new(format!("custom-{index:02}"));
            let meta = LevelMeta {
                atlas_id: 1 + index as u32,
                fastest_time: Some(60_000),
                ..LevelMeta::default()
            };
            let _ = catalog.insert(level.clone(), meta);
            let _ = solvers.insert(level.clone(), (0..8).map(PlayerId::new).collect());
            let _ = snapshot.level_ranks.insert(level, index as f64);
        }
        Dataset {
            catalog,
            solvers,
            ranks: Some(snapshot),
            community: CommunityReachability::default(),
            banned: BTreeSet::new(),
        }
    }

    fn request(kind: Kind, include_full: bool) -> GenerateRequest<'static> {
        GenerateRequest {
            kind,
            seed: "weekly",
            include_full,
        }
    }

    #[test]
    fn atlas_runs_are_reproducible_from_the_seed() {
        let dataset = dataset(12);
        let template = NexusTemplate::linear(8).expect("linear");
        let args = Args::new();

        let first = generate(request(Kind::Atlas, false), &dataset, &template, &args)
            .expect("enough levels");
        let second = generate(request(Kind::Atlas, false), &dataset, &template, &args)
            .expect("enough levels");
        assert_eq!(first.hash, second.hash);
        assert!(first.assignment.is_complete());
        assert_eq!(first.args["type"], "atlas");
        assert_eq!(first.template.level_door_ids.len(), 8);
    }

    #[test]
    fn short_supply_is_refused() {
        let dataset = dataset(3);
        let template = NexusTemplate::linear(8).expect("linear");
        let error = generate(request(Kind::Atlas, false), &dataset, &template, &Args::new())
            .expect_err("too few levels");
        assert_eq!(
            error.downcast_ref::<SupplyError>(),
            Some(&SupplyError::NotEnoughLevels {
                available: 3,
                needed: 8
            })
        );
    }

    #[test]
    fn full_assignments_include_the_back_door() {
        let dataset = dataset(8);
        let template = NexusTemplate::linear(4).expect("linear");
        let report = generate(request(Kind::Atlas, true), &dataset, &template, &Args::new())
            .expect("enough levels");
        let full = report.full.expect("requested");
        assert_eq!(full.door_ids.len(), 5);

        let json = serde_json::to_value(&report.assignment).expect("serializes");
        assert_eq!(json["levels"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn hidden_names_reach_the_full_assignment() {
        let dataset = dataset(8);
        let template = NexusTemplate::linear(4).expect("linear");
        let mut args = Args::new();
        let _ = args.insert("hide-names".to_owned(), "y".to_owned());
        let report = generate(request(Kind::Atlas, true), &dataset, &template, &args)
            .expect("enough levels");
        let full = report.full.expect("requested");
        assert_eq!(full.names, ["???", "???", "???", "???", ""]);
        assert_eq!(full.authors.len(), 5);
    }

    #[test]
    fn affinity_requires_the_historical_door_count() {
        let dataset = dataset(70);
        let template = NexusTemplate::linear(16).expect("linear");
        assert!(generate(request(Kind::Affinity, false), &dataset, &template, &Args::new()).is_err());

        let template = historical_template();
        let report = generate(request(Kind::Affinity, true), &dataset, &template, &Args::new())
            .expect("enough levels");
        assert_eq!(report.assignment.len(), AFFINITY_SLOTS);
        assert_eq!(report.assignment.doors, template.level_door_sets());
        let full = report.full.expect("requested");
        assert_eq!(full.door_ids, template.level_door_ids());
    }
}
