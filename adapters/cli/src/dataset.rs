//! Loading of the collaborator-produced dataset directory.

use std::{
    collections::BTreeSet,
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use log::info;
use nexus_randomizer_core::{LevelCatalog, LevelId, RankScores, RankSnapshot, SolverMap};
use nexus_randomizer_system_filtering::{CommunityReachability, CommunityTree};
use nexus_randomizer_system_ranking::RankEngine;
use serde::de::DeserializeOwned;

const LEVELS_FILE: &str = "levels.json";
const SOLVERS_FILE: &str = "solvers.json";
const RANKS_FILE: &str = "ranks.json";
const COMMUNITY_FILE: &str = "community.json";
const BANNED_FILE: &str = "banned_levels.json";

/// Everything the filters and generators read from a dataset directory.
#[derive(Debug)]
pub(crate) struct Dataset {
    pub(crate) catalog: LevelCatalog,
    pub(crate) solvers: SolverMap,
    pub(crate) ranks: Option<RankSnapshot>,
    pub(crate) community: CommunityReachability,
    pub(crate) banned: BTreeSet<LevelId>,
}

impl Dataset {
    /// Reads a dataset directory. Only `levels.json` is mandatory; every other
    /// file falls back to an empty value when absent.
    pub(crate) fn load(dir: &Path) -> Result<Self> {
        let catalog: LevelCatalog = read_json(&dir.join(LEVELS_FILE))?;
        info!("loaded {} catalog levels from {}", catalog.len(), dir.display());

        let raw_solvers: SolverMap = read_optional_json(&dir.join(SOLVERS_FILE))?.unwrap_or_default();
        let solvers: SolverMap = raw_solvers
            .iter()
            .filter(|(level, _)| catalog.contains(level.as_str()))
            .map(|(level, players)| (level.clone(), players.to_vec()))
            .collect();
        if solvers.len() != raw_solvers.len() {
            info!(
                "dropped {} solver rows for levels outside the catalog",
                raw_solvers.len() - solvers.len()
            );
        }

        let ranks: Option<RankSnapshot> = read_optional_json(&dir.join(RANKS_FILE))?;
        let tree: CommunityTree = read_optional_json(&dir.join(COMMUNITY_FILE))?.unwrap_or_default();
        let banned: Vec<LevelId> = read_optional_json(&dir.join(BANNED_FILE))?.unwrap_or_default();

        Ok(Self {
            catalog,
            solvers,
            ranks,
            community: CommunityReachability::from_tree(&tree),
            banned: banned.into_iter().collect(),
        })
    }

    /// Stored rank scores, or freshly computed ones when the dataset has none.
    pub(crate) fn rank_scores(&self) -> RankScores {
        match &self.ranks {
            Some(snapshot) => snapshot.clone().into_scores(),
            None => {
                info!("{RANKS_FILE} missing; computing ranks");
                self.compute_ranks().into_scores()
            }
        }
    }

    /// Runs the ranking engine and stamps the result with the current time.
    pub(crate) fn compute_ranks(&self) -> RankSnapshot {
        let outcome = RankEngine::default().compute_ranks(&self.catalog, &self.solvers);
        RankSnapshot::new(outcome.scores, now_nanos())
    }

    /// Generation time identifying the dataset's rank scores; zero when unranked.
    pub(crate) fn rank_gen_time(&self) -> u64 {
        self.ranks.as_ref().map_or(0, |snapshot| snapshot.gen_time)
    }
}

/// Nanoseconds since the Unix epoch, saturating on clocks set before it.
pub(crate) fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        info!("no {} found; using an empty value", path.display());
        return Ok(None);
    }
    read_json(path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_files_default_to_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(
            dir.path().join(LEVELS_FILE),
            r#"{"downhill": {"atlas_id": 1, "author": "hitbox", "tiles": {"2": 40}}}"#,
        )
        .expect("write levels");

        let dataset = Dataset::load(dir.path()).expect("dataset loads");
        assert_eq!(dataset.catalog.len(), 1);
        assert!(dataset.solvers.is_empty());
        assert!(dataset.banned.is_empty());
        assert!(dataset.community.community_levels().is_empty());
        assert_eq!(dataset.rank_gen_time(), 0);
    }

    #[test]
    fn solver_rows_outside_the_catalog_are_dropped() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join(LEVELS_FILE), r#"{"a": {"atlas_id": 1}}"#).expect("levels");
        fs::write(dir.path().join(SOLVERS_FILE), r#"{"a": [1, 2], "ghost": [3]}"#).expect("solvers");
        fs::write(dir.path().join(BANNED_FILE), r#"["a"]"#).expect("banned");

        let dataset = Dataset::load(dir.path()).expect("dataset loads");
        assert_eq!(dataset.solvers.len(), 1);
        assert_eq!(dataset.solvers.solver_count("a"), 2);
        assert!(dataset.banned.contains("a"));
    }

    #[test]
    fn malformed_files_name_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join(LEVELS_FILE), "{not json").expect("levels");
        let error = Dataset::load(dir.path()).expect_err("parse failure");
        assert!(format!("{error:#}").contains(LEVELS_FILE));
    }
}
