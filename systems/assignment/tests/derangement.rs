use std::collections::BTreeSet;

use nexus_randomizer_system_assignment::derange;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

proptest! {
    #[test]
    fn derangements_are_fixed_point_free_permutations(seed in any::<u64>(), n in 2usize..64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let permutation = derange(&mut rng, n).expect("n >= 2");

        prop_assert_eq!(permutation.len(), n);
        let values: BTreeSet<usize> = permutation.iter().copied().collect();
        prop_assert_eq!(values, (0..n).collect::<BTreeSet<_>>());
        for (index, value) in permutation.iter().enumerate() {
            prop_assert_ne!(index, *value);
        }
    }
}

#[test]
fn size_two_always_swaps() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    for _ in 0..100 {
        assert_eq!(derange(&mut rng, 2), Ok(vec![1, 0]));
    }
}
