use std::collections::BTreeMap;

use log::warn;
use nexus_randomizer_core::{LevelCatalog, LevelId, SolverMap};

/// Predicts how many perfect clears each level would have if it were of
/// average difficulty.
///
/// Levels with a solver row and catalog metadata are split by whether they
/// were ever the daily level. Each group gets its own least-squares line from
/// atlas id to solver count, since newer levels and daily levels see very
/// different traffic. Groups too small or too uniform to fit a line predict
/// their mean count instead.
#[must_use]
pub fn expected_solver_counts(
    catalog: &LevelCatalog,
    solvers: &SolverMap,
) -> BTreeMap<LevelId, f64> {
    let mut groups: [Vec<(&LevelId, f64, f64)>; 2] = [Vec::new(), Vec::new()];
    for (level, players) in solvers.iter() {
        let Some(meta) = catalog.get(level.as_str()) else {
            warn!("solver row for {level} has no catalog entry; skipping");
            continue;
        };
        groups[usize::from(meta.was_daily)].push((
            level,
            f64::from(meta.atlas_id),
            players.len() as f64,
        ));
    }

    let mut expected = BTreeMap::new();
    for group in &groups {
        let fit = LinearFit::from_points(group.iter().map(|&(_, x, y)| (x, y)));
        for &(level, x, _) in group {
            let _ = expected.insert(level.clone(), fit.predict(x));
        }
    }
    expected
}

/// Difficulty implied by a level's solver count relative to its expected count.
///
/// `sigmoid((ln(expected) - ln(actual)) * multiplier)`, with both counts
/// floored at one: a level cleared by fewer players than predicted scores
/// above one half.
#[must_use]
pub fn naive_difficulty(expected: f64, actual: usize, multiplier: f64) -> f64 {
    let expected = expected.max(1.0);
    let actual = actual.max(1) as f64;
    let x = expected.ln() - actual.ln();
    1.0 / (1.0 + (-x * multiplier).exp())
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct LinearFit {
    intercept: f64,
    slope: f64,
}

impl LinearFit {
    fn from_points(points: impl Iterator<Item = (f64, f64)> + Clone) -> Self {
        let count = points.clone().count();
        if count == 0 {
            return Self {
                intercept: 0.0,
                slope: 0.0,
            };
        }

        let n = count as f64;
        let (sum_x, sum_y) = points
            .clone()
            .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
        let mean_x = sum_x / n;
        let mean_y = sum_y / n;

        let (covariance, variance) = points.fold((0.0, 0.0), |(cov, var), (x, y)| {
            let dx = x - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });

        if count < 2 || variance == 0.0 {
            return Self {
                intercept: mean_y,
                slope: 0.0,
            };
        }

        let slope = covariance / variance;
        Self {
            intercept: mean_y - slope * mean_x,
            slope,
        }
    }

    fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}
