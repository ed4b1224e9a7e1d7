#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Iterative level difficulty and player skill ranking.
//!
//! A level's difficulty is dominated by the least skilled players that
//! perfectly cleared it, and a player's skill by the hardest levels they
//! cleared. The engine alternates those two updates from a regression-based
//! starting point until the scores stop moving.

mod baseline;
mod decay;

use std::collections::BTreeMap;

use log::{debug, info, warn};
use nexus_randomizer_core::{LevelCatalog, LevelId, PlayerId, RankScores, SolverMap};

pub use baseline::{expected_solver_counts, naive_difficulty};
pub use decay::decay_sum;

/// Tuning knobs for the ranking fixed point.
#[derive(Clone, Debug, PartialEq)]
pub struct RankTuning {
    /// Decay applied to ascending solver skills when scoring a level; closer to
    /// one spreads the weight over more solvers.
    pub level_alpha: f64,
    /// Decay applied to descending level difficulties when scoring a player.
    pub player_alpha: f64,
    /// Steepness of the sigmoid mapping the solver-count ratio to a naive difficulty.
    pub sigmoid_mult: f64,
    /// Exponent weight of the naive difficulty in every level update; the
    /// remainder goes to the solver-skill term.
    pub regression_weighting: f64,
    /// Summed squared change across all scores below which the loop stops.
    pub convergence_threshold: f64,
    /// Optional iteration cap. `None` iterates until convergence.
    pub max_iterations: Option<u32>,
}

impl Default for RankTuning {
    fn default() -> Self {
        Self {
            level_alpha: 0.95,
            player_alpha: 0.90,
            sigmoid_mult: 2.0,
            regression_weighting: 0.4,
            convergence_threshold: 1e-11,
            max_iterations: None,
        }
    }
}

/// Result of a ranking run.
#[derive(Clone, Debug, PartialEq)]
pub struct RankOutcome {
    /// Final level difficulties and player skills.
    pub scores: RankScores,
    /// Number of update rounds performed.
    pub iterations: u32,
    /// Whether the configured iteration cap stopped the loop before convergence.
    pub capped: bool,
}

/// Pure ranking engine owning its tuning.
#[derive(Clone, Debug, Default)]
pub struct RankEngine {
    tuning: RankTuning,
}

impl RankEngine {
    /// Creates an engine with the provided tuning.
    #[must_use]
    pub fn new(tuning: RankTuning) -> Self {
        Self { tuning }
    }

    /// Tuning the engine runs with.
    #[must_use]
    pub fn tuning(&self) -> &RankTuning {
        &self.tuning
    }

    /// Computes level difficulties and player skills.
    ///
    /// Only levels with a solver row and catalog metadata are ranked. Every
    /// player that solved a ranked level receives a skill.
    #[must_use]
    pub fn compute_ranks(&self, catalog: &LevelCatalog, solvers: &SolverMap) -> RankOutcome {
        let tuning = &self.tuning;
        let expected = expected_solver_counts(catalog, solvers);

        let mut levels: Vec<RankedLevel<'_>> = Vec::with_capacity(expected.len());
        let mut player_levels: BTreeMap<PlayerId, Vec<usize>> = BTreeMap::new();
        for (level, players) in solvers.iter() {
            let Some(&prediction) = expected.get(level) else {
                continue;
            };
            let index = levels.len();
            for &player in players {
                player_levels.entry(player).or_default().push(index);
            }
            levels.push(RankedLevel {
                id: level,
                solvers: players,
                naive: naive_difficulty(prediction, players.len(), tuning.sigmoid_mult),
            });
        }

        let players: Vec<PlayerId> = player_levels.keys().copied().collect();
        let player_index: BTreeMap<PlayerId, usize> = players
            .iter()
            .enumerate()
            .map(|(index, &player)| (player, index))
            .collect();
        let solved: Vec<&[usize]> = player_levels.values().map(Vec::as_slice).collect();

        let mut level_scores: Vec<f64> = levels.iter().map(|level| level.naive).collect();
        let mut player_scores = vec![0.5; players.len()];
        let mut scratch = Vec::new();

        let mut iterations = 0;
        let mut capped = false;
        loop {
            if tuning
                .max_iterations
                .map_or(false, |cap| iterations >= cap)
            {
                warn!(
                    "ranking stopped at the iteration cap of {iterations} before converging"
                );
                capped = true;
                break;
            }
            iterations += 1;

            let next_levels: Vec<f64> = levels
                .iter()
                .map(|level| {
                    scratch.clear();
                    scratch.extend(
                        level
                            .solvers
                            .iter()
                            .map(|player| player_scores[player_index[player]]),
                    );
                    scratch.sort_by(f64::total_cmp);
                    let skill_term = decay_sum(&scratch, tuning.level_alpha, 1.0);
                    level.naive.powf(tuning.regression_weighting)
                        * skill_term.powf(1.0 - tuning.regression_weighting)
                })
                .collect();

            let next_players: Vec<f64> = solved
                .iter()
                .map(|levels| {
                    scratch.clear();
                    scratch.extend(levels.iter().map(|&index| level_scores[index]));
                    scratch.sort_by(|a, b| b.total_cmp(a));
                    decay_sum(&scratch, tuning.player_alpha, 0.0)
                })
                .collect();

            let level_error = squared_change(&level_scores, &next_levels);
            let player_error = squared_change(&player_scores, &next_players);
            level_scores = next_levels;
            player_scores = next_players;

            debug!("iteration {iterations}: convergence errors {level_error:e} {player_error:e}");
            if level_error + player_error < tuning.convergence_threshold {
                break;
            }
        }

        info!(
            "ranked {} levels and {} players in {iterations} iterations",
            levels.len(),
            players.len()
        );

        let level_ranks: BTreeMap<LevelId, f64> = levels
            .iter()
            .zip(level_scores)
            .map(|(level, score)| (level.id.clone(), score))
            .collect();
        let player_ranks: BTreeMap<PlayerId, f64> = players.into_iter().zip(player_scores).collect();

        RankOutcome {
            scores: RankScores {
                level_ranks,
                player_ranks,
            },
            iterations,
            capped,
        }
    }
}

struct RankedLevel<'a> {
    id: &'a LevelId,
    solvers: &'a [PlayerId],
    naive: f64,
}

fn squared_change(previous: &[f64], next: &[f64]) -> f64 {
    previous
        .iter()
        .zip(next)
        .map(|(old, new)| (old - new) * (old - new))
        .sum()
}
