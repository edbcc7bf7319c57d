//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. PIP contract — exactly n_pips points, strictly increasing x, fixed
//!    endpoints, deterministic
//! 2. Martin antisymmetry — martin(r) = -martin(-r)
//! 3. Z-score moments — mean 0, unit population variance
//! 4. Collector ordering — origins strictly increasing, vectors normalized
//! 5. Seed hierarchy — deterministic and input-sensitive

use proptest::prelude::*;

use motiflab_core::metrics::martin_ratio;
use motiflab_core::patterns::{collect_unique_patterns, zscore};
use motiflab_core::pips::{find_pips, DistanceMeasure};
use motiflab_core::seeds::SeedHierarchy;

fn arb_window() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-50.0..50.0_f64, 12..40)
}

fn arb_measure() -> impl Strategy<Value = DistanceMeasure> {
    prop_oneof![
        Just(DistanceMeasure::Euclidean),
        Just(DistanceMeasure::Perpendicular),
        Just(DistanceMeasure::Vertical),
    ]
}

// ── 1. PIP contract ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn pip_contract_holds(
        window in arb_window(),
        n_pips in 3..=8_usize,
        measure in arb_measure(),
    ) {
        let pips = find_pips(&window, n_pips, measure).unwrap();

        prop_assert_eq!(pips.x.len(), n_pips);
        prop_assert_eq!(pips.y.len(), n_pips);
        prop_assert_eq!(pips.x[0], 0);
        prop_assert_eq!(pips.x[n_pips - 1], window.len() - 1);

        for w in pips.x.windows(2) {
            prop_assert!(w[0] < w[1]);
        }
        for (x, y) in pips.x.iter().zip(&pips.y) {
            prop_assert_eq!(*y, window[*x]);
        }
    }

    #[test]
    fn pip_extraction_is_deterministic(
        window in arb_window(),
        n_pips in 3..=8_usize,
        measure in arb_measure(),
    ) {
        let a = find_pips(&window, n_pips, measure).unwrap();
        let b = find_pips(&window, n_pips, measure).unwrap();
        prop_assert_eq!(a, b);
    }
}

// ── 2. Martin antisymmetry ───────────────────────────────────────────

proptest! {
    #[test]
    fn martin_is_antisymmetric(
        returns in prop::collection::vec(-0.1..0.1_f64, 2..60),
    ) {
        let negated: Vec<f64> = returns.iter().map(|r| -r).collect();
        let m = martin_ratio(&returns);
        let n = martin_ratio(&negated);
        prop_assert!(m.is_finite());
        prop_assert!((m + n).abs() < 1e-9, "martin {} vs negated {}", m, n);
    }
}

// ── 3. Z-score moments ───────────────────────────────────────────────

proptest! {
    #[test]
    fn zscore_moments(values in prop::collection::vec(-100.0..100.0_f64, 3..12)) {
        if let Some(normalized) = zscore(&values) {
            let n = normalized.len() as f64;
            let mean = normalized.iter().sum::<f64>() / n;
            let var = normalized.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            prop_assert!(mean.abs() < 1e-9, "mean {}", mean);
            prop_assert!((var - 1.0).abs() < 1e-9, "variance {}", var);
        }
    }
}

// ── 4. Collector ordering ────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn collector_origins_strictly_increase(
        data in prop::collection::vec(-10.0..10.0_f64, 40..120),
        hold in 0..6_usize,
    ) {
        let patterns =
            collect_unique_patterns(&data, 4, 12, hold, DistanceMeasure::Vertical).unwrap();

        for w in patterns.windows(2) {
            prop_assert!(w[0].origin < w[1].origin);
        }
        for p in &patterns {
            prop_assert!(p.origin + hold < data.len() || hold == 0);
            prop_assert_eq!(p.vector.len(), 4);
            let n = p.vector.len() as f64;
            let mean = p.vector.iter().sum::<f64>() / n;
            prop_assert!(mean.abs() < 1e-9);
        }
    }
}

// ── 5. Seed hierarchy ────────────────────────────────────────────────

proptest! {
    #[test]
    fn seed_hierarchy_is_deterministic(master in any::<u64>(), index in any::<u64>()) {
        let a = SeedHierarchy::new(master);
        let b = SeedHierarchy::new(master);
        prop_assert_eq!(a.sub_seed("x", index), b.sub_seed("x", index));
    }

    #[test]
    fn seed_hierarchy_separates_indices(master in any::<u64>(), index in 0..u64::MAX - 1) {
        let seeds = SeedHierarchy::new(master);
        prop_assert_ne!(seeds.sub_seed("x", index), seeds.sub_seed("x", index + 1));
    }
}
