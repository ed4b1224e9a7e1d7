use rand::Rng;
use thiserror::Error;

/// Errors raised when a derangement cannot exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DerangementError {
    /// Sequences of length zero or one have no permutation without a fixed point.
    #[error("cannot derange {len} items; at least two are required")]
    TooSmall {
        /// Requested length.
        len: usize,
    },
}

/// Draws a random permutation of `0..n` with no fixed point.
///
/// Runs a Fisher-Yates shuffle front to back and restarts from the identity
/// whenever a position ends up holding its own index. Each attempt succeeds
/// with probability close to `1/e`.
pub fn derange<R>(rng: &mut R, n: usize) -> Result<Vec<usize>, DerangementError>
where
    R: Rng + ?Sized,
{
    if n <= 1 {
        return Err(DerangementError::TooSmall { len: n });
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    'attempt: loop {
        for (index, value) in permutation.iter_mut().enumerate() {
            *value = index;
        }
        for index in 0..n {
            let swap = rng.gen_range(index..n);
            permutation.swap(index, swap);
            if permutation[index] == index {
                continue 'attempt;
            }
        }
        return Ok(permutation);
    }
}
