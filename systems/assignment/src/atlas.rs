use log::{debug, info};
use nexus_randomizer_core::{
    arg, parse_int_or, Args, KeyTier, LevelId, NexusTemplate, RandomizerAssignment, RankScores,
};
use rand::{seq::SliceRandom, Rng};

/// Settings for difficulty-window atlas assignment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasAssignConfig {
    /// Lower edge of the difficulty window as a fraction of the ranked candidates.
    pub min_difficulty: f64,
    /// Upper edge of the difficulty window as a fraction of the ranked candidates.
    pub max_difficulty: f64,
    /// Shuffle whole (level, door, key) slots after tiered placement.
    pub rand_doors: bool,
}

impl Default for AtlasAssignConfig {
    fn default() -> Self {
        Self {
            min_difficulty: 0.0,
            max_difficulty: 1.0,
            rand_doors: false,
        }
    }
}

impl AtlasAssignConfig {
    /// Reads `min-difficulty` and `max-difficulty` in thousandths and treats
    /// any non-empty `rand-doors` as enabled.
    #[must_use]
    pub fn from_args(args: &Args) -> Self {
        let defaults = Self::default();
        let thousandths = |key: &str, default: &str, fallback: f64| {
            let value = arg(args, key, default).trim();
            value
                .parse::<i64>()
                .map_or(fallback, |value| value as f64 / 1000.0)
        };
        Self {
            min_difficulty: thousandths("min-difficulty", "0", defaults.min_difficulty),
            max_difficulty: thousandths("max-difficulty", "1000", defaults.max_difficulty),
            rand_doors: !arg(args, "rand-doors", "").is_empty(),
        }
    }
}

/// Difficulty used for ordering; unranked levels sort as easiest.
pub(crate) fn rank_of(ranks: &RankScores, level: &LevelId) -> f64 {
    ranks.level_difficulty(level.as_str()).unwrap_or(0.0)
}

pub(crate) fn sort_by_rank(levels: &mut [LevelId], ranks: &RankScores) {
    levels.sort_by(|a, b| rank_of(ranks, a).total_cmp(&rank_of(ranks, b)));
}

/// Picks up to `count` candidates from the configured difficulty window and
/// returns them sorted from easiest to hardest.
///
/// The window `[round(min * len), round(max * len))` is widened one step at a
/// time on both ends until it holds `count` levels or covers every candidate.
pub(crate) fn select_window<R>(
    rng: &mut R,
    candidates: &[LevelId],
    ranks: &RankScores,
    config: &AtlasAssignConfig,
    count: usize,
) -> Vec<LevelId>
where
    R: Rng + ?Sized,
{
    let mut ordered = candidates.to_vec();
    sort_by_rank(&mut ordered, ranks);

    let len = ordered.len();
    let window_edge = |fraction: f64| -> usize {
        let scaled = (fraction * len as f64).round_ties_even();
        scaled.clamp(0.0, len as f64) as usize
    };
    let mut end = window_edge(config.max_difficulty);
    let mut start = window_edge(config.min_difficulty).min(end);

    while end - start < count {
        let mut moved = false;
        if end < len {
            end += 1;
            moved = true;
        }
        if start > 0 {
            start -= 1;
            moved = true;
        }
        if !moved {
            break;
        }
    }
    debug!("difficulty window [{start}, {end}) of {len} candidates");

    let mut window = ordered[start..end].to_vec();
    window.shuffle(rng);
    window.truncate(count);
    sort_by_rank(&mut window, ranks);
    window
}

/// Assigns filtered catalog levels to the template's level doors by difficulty.
///
/// The selected levels are split easiest-first into one chunk per key tier,
/// sized by the number of doors of that tier, and each chunk is shuffled
/// across its tier's doors. Slots stay unfilled when too few candidates exist.
pub fn atlas_randomize<R>(
    rng: &mut R,
    candidates: &[LevelId],
    ranks: &RankScores,
    template: &NexusTemplate,
    config: &AtlasAssignConfig,
) -> RandomizerAssignment
where
    R: Rng + ?Sized,
{
    let slots = template.level_door_count();
    let selected = select_window(rng, candidates, ranks, config, slots);
    info!(
        "selected {} of {} candidates for {slots} slots",
        selected.len(),
        candidates.len()
    );

    let mut assignment = RandomizerAssignment::unfilled(template);
    let mut remaining = selected.into_iter();
    for tier in KeyTier::ALL {
        let tier_slots: Vec<usize> = assignment
            .doors
            .iter()
            .enumerate()
            .filter(|(_, door)| door.key_tier() == Some(tier))
            .map(|(slot, _)| slot)
            .collect();
        let mut chunk: Vec<LevelId> = remaining.by_ref().take(tier_slots.len()).collect();
        chunk.shuffle(rng);
        for (slot, level) in tier_slots.into_iter().zip(chunk) {
            assignment.levels[slot] = Some(level);
        }
    }

    if config.rand_doors {
        let mut permutation: Vec<usize> = (0..slots).collect();
        permutation.shuffle(rng);
        assignment.permute(&permutation);
    }
    assignment
}
