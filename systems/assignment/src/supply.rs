use nexus_randomizer_core::LevelId;
use thiserror::Error;

/// Raised when the filters leave fewer levels than the layout has slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SupplyError {
    /// Too few candidates survived filtering.
    #[error("{available} matching levels, need {needed}")]
    NotEnoughLevels {
        /// Candidates after filtering.
        available: usize,
        /// Slots that must be filled.
        needed: usize,
    },
}

/// Checks that `candidates` can fill `needed` slots.
///
/// Generation itself tolerates short supply by leaving slots unfilled; this
/// lets callers refuse before generating instead.
pub fn ensure_supply(candidates: &[LevelId], needed: usize) -> Result<(), SupplyError> {
    if candidates.len() < needed {
        return Err(SupplyError::NotEnoughLevels {
            available: candidates.len(),
            needed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_supply_is_reported_with_counts() {
        let candidates = vec![LevelId::new("a"), LevelId::new("b")];
        assert_eq!(ensure_supply(&candidates, 2), Ok(()));
        let error = ensure_supply(&candidates, 3).expect_err("one short");
        assert_eq!(error.to_string(), "2 matching levels, need 3");
    }
}
