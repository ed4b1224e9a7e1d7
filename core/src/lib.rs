#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the nexus randomizer.
//!
//! This crate defines the data surface that connects adapters and the pure
//! systems. Adapters load a [`LevelCatalog`], a [`SolverMap`] and a
//! [`NexusTemplate`] from whatever collaborator produced them, the ranking
//! system turns those into [`RankScores`], and the assignment systems consume
//! everything to produce a [`RandomizerAssignment`] for the level writer.
//! Nothing in this crate performs I/O.

use std::{borrow::Borrow, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

mod args;
mod assignment;
mod door;
mod template;

pub use args::{
    arg, parse_id_list, parse_int_or, parse_name_set, parse_time_ms, predicates_pass, Args,
    TriState,
};
pub use assignment::{
    AssignmentShapeError, CreditVisibility, FullAssignment, RandomizerAssignment,
    BACK_DOOR_LEVEL, HIDDEN_LEVEL_NAME,
};
pub use door::{DoorInfo, DoorSet, KeyTier, SpriteSet};
pub use template::{
    assign_key_rewards, DoorId, DoorSlot, NexusTemplate, TemplateError, LINEAR_TEMPLATE_MAX_LEVELS,
    LINEAR_TEMPLATE_NAME,
};

/// Stable identifier of a level, unchanged across catalog refreshes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(String);

impl LevelId {
    /// Creates a level identifier from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LevelId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LevelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LevelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a player. No player metadata beyond identity is modelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u64);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Entity name of the collectible apple used by the apple predicate.
pub const APPLE_ENTITY: &str = "hittable_apple";

/// Metadata describing a single catalog level. Read-only input to the core.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelMeta {
    /// External catalog identifier; zero marks a level that is not eligible.
    pub atlas_id: u32,
    /// Display name of the level's author.
    pub author: String,
    /// Whether the level was ever featured as the daily level.
    pub was_daily: bool,
    /// Fastest perfect clear in milliseconds, if any clear was recorded.
    pub fastest_time: Option<u64>,
    /// Histogram of tile sprite sets keyed by the raw sprite set value.
    pub tiles: BTreeMap<u8, u64>,
    /// Histogram of entity type names.
    pub entities: BTreeMap<String, u64>,
    /// Human readable level name.
    pub name: String,
}

impl LevelMeta {
    /// Reports whether the level carries a non-zero external catalog id.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.atlas_id != 0
    }

    /// Number of tiles drawn from the provided sprite set.
    #[must_use]
    pub fn tile_count(&self, sprite_set: SpriteSet) -> u64 {
        self.tiles.get(&sprite_set.value()).copied().unwrap_or(0)
    }

    /// Number of entities with the provided type name.
    #[must_use]
    pub fn entity_count(&self, name: &str) -> u64 {
        self.entities.get(name).copied().unwrap_or(0)
    }

    /// Reports whether at least one entity of the provided type exists.
    ///
    /// Presence is key presence: a histogram entry with a zero count still
    /// counts as present.
    #[must_use]
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }
}

/// Ordered mapping from level identifiers to their metadata.
///
/// Iteration follows key order, which is the catalog order every filter
/// reports its results in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    levels: BTreeMap<LevelId, LevelMeta>,
}

impl LevelCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a level, returning the previous metadata.
    pub fn insert(&mut self, level: LevelId, meta: LevelMeta) -> Option<LevelMeta> {
        self.levels.insert(level, meta)
    }

    /// Looks up a level's metadata.
    #[must_use]
    pub fn get(&self, level: &str) -> Option<&LevelMeta> {
        self.levels.get(level)
    }

    /// Reports whether the catalog knows the provided level.
    #[must_use]
    pub fn contains(&self, level: &str) -> bool {
        self.levels.contains_key(level)
    }

    /// Iterator over every level in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&LevelId, &LevelMeta)> {
        self.levels.iter()
    }

    /// Number of levels in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<(LevelId, LevelMeta)> for LevelCatalog {
    fn from_iter<T: IntoIterator<Item = (LevelId, LevelMeta)>>(iter: T) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

/// Mapping from level identifier to the players that perfectly cleared it.
///
/// A level absent from the map is treated as having zero solvers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolverMap {
    solvers: BTreeMap<LevelId, Vec<PlayerId>>,
}

impl SolverMap {
    /// Creates an empty solver map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the solver list of a level.
    pub fn insert(&mut self, level: LevelId, players: Vec<PlayerId>) -> Option<Vec<PlayerId>> {
        self.solvers.insert(level, players)
    }

    /// Players recorded for the level; empty when the level has no entry.
    #[must_use]
    pub fn solvers_of(&self, level: &str) -> &[PlayerId] {
        self.solvers.get(level).map_or(&[], Vec::as_slice)
    }

    /// Number of perfect clears recorded for the level.
    #[must_use]
    pub fn solver_count(&self, level: &str) -> usize {
        self.solvers_of(level).len()
    }

    /// Reports whether the level has a solver row, even an empty one.
    #[must_use]
    pub fn contains(&self, level: &str) -> bool {
        self.solvers.contains_key(level)
    }

    /// Iterator over every solver row in level order.
    pub fn iter(&self) -> impl Iterator<Item = (&LevelId, &[PlayerId])> {
        self.solvers
            .iter()
            .map(|(level, players)| (level, players.as_slice()))
    }

    /// Number of levels with a solver row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solvers.len()
    }

    /// Reports whether no solver rows exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solvers.is_empty()
    }
}

impl FromIterator<(LevelId, Vec<PlayerId>)> for SolverMap {
    fn from_iter<T: IntoIterator<Item = (LevelId, Vec<PlayerId>)>>(iter: T) -> Self {
        Self {
            solvers: iter.into_iter().collect(),
        }
    }
}

/// Normalised difficulty per level and skill per player, each in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RankScores {
    /// Difficulty of every ranked level.
    pub level_ranks: BTreeMap<LevelId, f64>,
    /// Skill of every player that appears in the solver map.
    pub player_ranks: BTreeMap<PlayerId, f64>,
}

impl RankScores {
    /// Difficulty of the provided level, if it was ranked.
    #[must_use]
    pub fn level_difficulty(&self, level: &str) -> Option<f64> {
        self.level_ranks.get(level).copied()
    }

    /// Skill of the provided player, if they were ranked.
    #[must_use]
    pub fn player_skill(&self, player: PlayerId) -> Option<f64> {
        self.player_ranks.get(&player).copied()
    }
}

/// Rank scores stamped with the caller-supplied generation time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RankSnapshot {
    /// Difficulty of every ranked level.
    pub level_ranks: BTreeMap<LevelId, f64>,
    /// Skill of every ranked player.
    pub player_ranks: BTreeMap<PlayerId, f64>,
    /// Generation timestamp in nanoseconds, attached by the caller.
    pub gen_time: u64,
}

impl RankSnapshot {
    /// Stamps freshly computed scores with a generation time.
    #[must_use]
    pub fn new(scores: RankScores, gen_time: u64) -> Self {
        Self {
            level_ranks: scores.level_ranks,
            player_ranks: scores.player_ranks,
            gen_time,
        }
    }

    /// Discards the timestamp, yielding the scores.
    #[must_use]
    pub fn into_scores(self) -> RankScores {
        RankScores {
            level_ranks: self.level_ranks,
            player_ranks: self.player_ranks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LevelCatalog, LevelId, LevelMeta, PlayerId, RankSnapshot, SolverMap, SpriteSet};

    #[test]
    fn missing_solver_rows_read_as_empty() {
        let mut solvers = SolverMap::new();
        let _ = solvers.insert(LevelId::new("a"), vec![PlayerId::new(1)]);
        assert_eq!(solvers.solver_count("a"), 1);
        assert_eq!(solvers.solver_count("b"), 0);
        assert!(solvers.solvers_of("b").is_empty());
    }

    #[test]
    fn level_meta_deserializes_with_defaults() {
        let json = r#"{"atlas_id": 2041, "author": "Someone", "tiles": {"2": 40, "4": 3}}"#;
        let meta: LevelMeta = serde_json::from_str(json).expect("level meta");
        assert!(meta.is_eligible());
        assert!(!meta.was_daily);
        assert_eq!(meta.fastest_time, None);
        assert_eq!(meta.tile_count(SpriteSet::Forest), 40);
        assert_eq!(meta.tile_count(SpriteSet::Laboratory), 3);
        assert_eq!(meta.tile_count(SpriteSet::City), 0);
    }

    #[test]
    fn catalog_iterates_in_key_order() {
        let catalog: LevelCatalog = ["c", "a", "b"]
            .into_iter()
            .map(|name| (LevelId::new(name), LevelMeta::default()))
            .collect();
        let order: Vec<&str> = catalog.iter().map(|(level, _)| level.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn rank_snapshot_reads_collaborator_json() {
        let json = r#"{
            "level_ranks": {"Cascade-1493": 0.25},
            "player_ranks": {"17": 0.75},
            "gen_time": 1700000000000000000
        }"#;
        let snapshot: RankSnapshot = serde_json::from_str(json).expect("rank snapshot");
        assert_eq!(snapshot.gen_time, 1_700_000_000_000_000_000);
        let scores = snapshot.into_scores();
        assert_eq!(scores.level_difficulty("Cascade-1493"), Some(0.25));
        assert_eq!(scores.player_skill(PlayerId::new(17)), Some(0.75));
    }
}
