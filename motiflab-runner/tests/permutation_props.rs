//! Property tests for the surrogate-series construction.
//!
//! The permutation test's validity rests on two properties of
//! `permute_prices`: the surrogate preserves the multiset of one-step
//! differences (same marginal distribution), and it is anchored at the
//! original first value.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use motiflab_runner::permute_prices;

fn sorted(mut v: Vec<f64>) -> Vec<f64> {
    v.sort_by(|a, b| a.partial_cmp(b).unwrap());
    v
}

proptest! {
    #[test]
    fn surrogate_preserves_length_and_anchor(
        data in prop::collection::vec(-100.0..100.0_f64, 0..80),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let surrogate = permute_prices(&data, &mut rng);
        prop_assert_eq!(surrogate.len(), data.len());
        if !data.is_empty() {
            prop_assert_eq!(surrogate[0], data[0]);
        }
    }

    #[test]
    fn surrogate_preserves_difference_multiset(
        data in prop::collection::vec(-100.0..100.0_f64, 2..80),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let surrogate = permute_prices(&data, &mut rng);

        let original: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
        let permuted: Vec<f64> = surrogate.windows(2).map(|w| w[1] - w[0]).collect();
        let a = sorted(original);
        let b = sorted(permuted);
        for (x, y) in a.iter().zip(&b) {
            prop_assert!((x - y).abs() < 1e-6, "difference multiset changed: {} vs {}", x, y);
        }
    }

    #[test]
    fn surrogate_is_seed_deterministic(
        data in prop::collection::vec(-100.0..100.0_f64, 2..40),
        seed in any::<u64>(),
    ) {
        let a = permute_prices(&data, &mut StdRng::seed_from_u64(seed));
        let b = permute_prices(&data, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a, b);
    }
}
