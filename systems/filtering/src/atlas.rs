use std::collections::BTreeSet;

use log::info;
use nexus_randomizer_core::{
    arg, parse_id_list, parse_int_or, parse_name_set, parse_time_ms, predicates_pass, Args,
    LevelCatalog, LevelId, LevelMeta, PlayerId, SolverMap, TriState, APPLE_ENTITY,
};

use crate::{level_sets::LEVELS_CMP, CommunityReachability, WantTree};

/// Default minimum perfect-clear count.
pub const ATLAS_MIN_SS_DEFAULT: &str = "5";
/// Default maximum perfect-clear count; negative means unbounded.
pub const ATLAS_MAX_SS_DEFAULT: &str = "-1";
/// Default minimum fastest time; empty means unbounded.
pub const ATLAS_MIN_TIME_DEFAULT: &str = "";
/// Default maximum fastest time.
pub const ATLAS_MAX_TIME_DEFAULT: &str = "3:00.000";

/// Constraints applied to catalog levels before atlas assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasFilterConfig {
    /// Fewest perfect clears a level may have.
    pub min_solvers: usize,
    /// Most perfect clears a level may have.
    pub max_solvers: Option<usize>,
    /// Lower bound on the fastest clear, in milliseconds.
    pub min_time_ms: Option<u64>,
    /// Upper bound on the fastest clear, in milliseconds.
    pub max_time_ms: Option<u64>,
    /// Membership of the curated comparison set.
    pub cmp: TriState,
    /// Whether the level was ever the daily level.
    pub daily: TriState,
    /// Reachability from the community nexus tree.
    pub community: TriState,
    /// Presence of an apple entity.
    pub apple: TriState,
    /// Reachability from the clockwise community loop.
    pub cw: TriState,
    /// Reachability from the counter-clockwise community loop.
    pub ccw: TriState,
    /// Reachability from the clunky nexus.
    pub clunky: TriState,
    /// Reachability from the backwards nexus.
    pub backwards: TriState,
    /// Lowercase authors to allow; empty allows everyone.
    pub required_authors: BTreeSet<String>,
    /// Lowercase authors to exclude.
    pub blocked_authors: BTreeSet<String>,
    /// Players that must all have perfectly cleared the level.
    pub required_solvers: Vec<PlayerId>,
    /// Players none of which may have perfectly cleared the level.
    pub forbidden_solvers: Vec<PlayerId>,
}

impl Default for AtlasFilterConfig {
    fn default() -> Self {
        Self::from_args(&Args::new())
    }
}

impl AtlasFilterConfig {
    /// Reads the filter from flat string arguments, falling back to the
    /// documented default for every missing or malformed value.
    #[must_use]
    pub fn from_args(args: &Args) -> Self {
        let default_min = parse_int_or(ATLAS_MIN_SS_DEFAULT, 0);
        let default_max = parse_int_or(ATLAS_MAX_SS_DEFAULT, -1);
        let min_solvers = parse_int_or(arg(args, "min-ss", ATLAS_MIN_SS_DEFAULT), default_min);
        let max_solvers = parse_int_or(arg(args, "max-ss", ATLAS_MAX_SS_DEFAULT), default_max);
        let tri = |key: &str, default: &str| TriState::from_arg(args, key, default);

        Self {
            min_solvers: usize::try_from(min_solvers).unwrap_or(0),
            max_solvers: usize::try_from(max_solvers).ok(),
            min_time_ms: time_bound(arg(args, "min-time", ATLAS_MIN_TIME_DEFAULT)),
            max_time_ms: time_bound(arg(args, "max-time", ATLAS_MAX_TIME_DEFAULT)),
            cmp: tri("cmp-filter", ""),
            daily: tri("daily-filter", ""),
            community: tri("community-filter", ""),
            apple: tri("apples-filter", ""),
            cw: tri("cw-filter", "n"),
            ccw: tri("ccw-filter", "n"),
            clunky: tri("clunky-filter", "n"),
            backwards: tri("backwards-filter", "n"),
            required_authors: parse_name_set(arg(args, "required-authors", "")),
            blocked_authors: parse_name_set(arg(args, "blocked-authors", "")),
            required_solvers: parse_id_list(arg(args, "ss-users", "")),
            forbidden_solvers: parse_id_list(arg(args, "no-ss-users", "")),
        }
    }

    fn has_time_bound(&self) -> bool {
        self.min_time_ms.is_some() || self.max_time_ms.is_some()
    }
}

// An unparseable time leaves that side unbounded rather than excluding
// every level.
fn time_bound(value: &str) -> Option<u64> {
    u64::try_from(parse_time_ms(value)).ok()
}

/// Read-only inputs shared by every atlas filter run.
#[derive(Clone, Copy, Debug)]
pub struct AtlasFilterInputs<'a> {
    /// Level metadata.
    pub catalog: &'a LevelCatalog,
    /// Perfect clears per level.
    pub solvers: &'a SolverMap,
    /// Levels that may never be selected.
    pub banned: &'a BTreeSet<LevelId>,
    /// Community tree memberships.
    pub community: &'a CommunityReachability,
}

/// Returns every catalog level passing the filter, in catalog order.
#[must_use]
pub fn atlas_filter_levels(
    inputs: AtlasFilterInputs<'_>,
    config: &AtlasFilterConfig,
) -> Vec<LevelId> {
    let result: Vec<LevelId> = inputs
        .catalog
        .iter()
        .filter(|(level, meta)| level_passes(&inputs, config, level, meta))
        .map(|(level, _)| level.clone())
        .collect();
    info!(
        "{} of {} catalog levels pass the atlas filter",
        result.len(),
        inputs.catalog.len()
    );
    result
}

fn level_passes(
    inputs: &AtlasFilterInputs<'_>,
    config: &AtlasFilterConfig,
    level: &LevelId,
    meta: &LevelMeta,
) -> bool {
    let name = level.as_str();
    if !meta.is_eligible() || inputs.banned.contains(level) {
        return false;
    }

    let solvers = inputs.solvers.solvers_of(name);
    if solvers.len() < config.min_solvers {
        return false;
    }
    if config.max_solvers.map_or(false, |max| solvers.len() > max) {
        return false;
    }

    if config.has_time_bound() {
        let Some(time) = meta.fastest_time else {
            return false;
        };
        if config.min_time_ms.map_or(false, |min| time < min) {
            return false;
        }
        if config.max_time_ms.map_or(false, |max| time > max) {
            return false;
        }
    }

    let community = inputs.community;
    let predicates = [
        (config.cmp, LEVELS_CMP.iter().any(|&cmp| cmp == name)),
        (config.daily, meta.was_daily),
        (config.community, community.is_community(name)),
        (config.apple, meta.has_entity(APPLE_ENTITY)),
        (config.cw, community.in_tree(WantTree::Clockwise, name)),
        (config.ccw, community.in_tree(WantTree::CounterClockwise, name)),
        (config.clunky, community.in_tree(WantTree::Clunky, name)),
        (config.backwards, community.in_tree(WantTree::Backwards, name)),
    ];
    if !predicates_pass(predicates) {
        return false;
    }

    let author = meta.author.to_lowercase();
    if !config.required_authors.is_empty() && !config.required_authors.contains(&author) {
        return false;
    }
    if config.blocked_authors.contains(&author) {
        return false;
    }

    config
        .required_solvers
        .iter()
        .all(|player| solvers.contains(player))
        && !config
            .forbidden_solvers
            .iter()
            .any(|player| solvers.contains(player))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form() {
        let config = AtlasFilterConfig::default();
        assert_eq!(config.min_solvers, 5);
        assert_eq!(config.max_solvers, None);
        assert_eq!(config.min_time_ms, None);
        assert_eq!(config.max_time_ms, Some(180_000));
        assert_eq!(config.cmp, TriState::DontCare);
        assert_eq!(config.cw, TriState::Forbidden);
        assert_eq!(config.backwards, TriState::Forbidden);
        assert!(config.required_authors.is_empty());
    }

    #[test]
    fn malformed_values_fall_back() {
        let args: Args = [
            ("min-ss", "lots"),
            ("max-ss", "40"),
            ("max-time", "whenever"),
            ("cw-filter", ""),
            ("ss-users", "3,abc,9"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect();
        let config = AtlasFilterConfig::from_args(&args);
        assert_eq!(config.min_solvers, 5);
        assert_eq!(config.max_solvers, Some(40));
        assert_eq!(config.max_time_ms, None);
        assert_eq!(config.cw, TriState::DontCare);
        assert_eq!(
            config.required_solvers,
            vec![PlayerId::new(3), PlayerId::new(9)]
        );
    }
}
