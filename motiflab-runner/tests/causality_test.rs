//! Look-ahead contamination tests for the walk-forward driver.
//!
//! Invariant: the signal at step `i` may not depend on price data from
//! index `i + 1` or later.
//!
//! Method: run the driver on a truncated series (0..=t) and on the full
//! series; assert signals 0..=t are identical between both runs. Any
//! difference means future data leaked into past signals. A second variant
//! perturbs the future instead of truncating it.

use motiflab_core::cluster::KMeansSilhouette;
use motiflab_core::miner::MinerConfig;
use motiflab_core::pips::DistanceMeasure;
use motiflab_runner::{run_walk_forward, WalkForwardConfig};

/// Deterministic pseudo-random walk using a simple LCG, with a slow cycle
/// underneath so the miner has recurring structure to latch onto.
fn make_test_series(n: usize) -> Vec<f64> {
    let mut level = 0.0;
    (0..n)
        .map(|i| {
            let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
            let noise = ((seed >> 33) % 200) as f64 * 0.001 - 0.1;
            level += noise;
            level + (i as f64 * 0.3).sin() * 0.25
        })
        .collect()
}

fn test_config() -> WalkForwardConfig {
    WalkForwardConfig {
        miner: MinerConfig {
            n_pips: 5,
            lookback: 24,
            hold_period: 6,
            distance: DistanceMeasure::Vertical,
            cluster_count_range: (4, 8),
        },
        train_size: 80,
        step_size: 40,
    }
}

#[test]
fn truncating_the_future_does_not_change_past_signals() {
    let data = make_test_series(240);
    let full = run_walk_forward(&data, test_config(), KMeansSilhouette::default(), 42).unwrap();
    assert_eq!(full.len(), data.len());

    for &t in &[100usize, 150, 220] {
        let truncated =
            run_walk_forward(&data[..=t], test_config(), KMeansSilhouette::default(), 42).unwrap();
        assert_eq!(truncated.len(), t + 1);
        for i in 0..=t {
            assert_eq!(
                truncated[i], full[i],
                "look-ahead contamination at step {i} (truncated at {t})"
            );
        }
    }
}

#[test]
fn perturbing_the_future_does_not_change_past_signals() {
    let data = make_test_series(240);
    let full = run_walk_forward(&data, test_config(), KMeansSilhouette::default(), 42).unwrap();

    let t = 170usize;
    let mut perturbed = data.clone();
    for (offset, value) in perturbed[t + 1..].iter_mut().enumerate() {
        *value += 5.0 + offset as f64 * 0.5;
    }

    let perturbed_signals =
        run_walk_forward(&perturbed, test_config(), KMeansSilhouette::default(), 42).unwrap();
    for i in 0..=t {
        assert_eq!(
            perturbed_signals[i], full[i],
            "future perturbation leaked into step {i}"
        );
    }
}

#[test]
fn signals_stay_in_the_allowed_set() {
    let data = make_test_series(240);
    let signals = run_walk_forward(&data, test_config(), KMeansSilhouette::default(), 42).unwrap();
    for (i, &s) in signals.iter().enumerate() {
        assert!(
            s == -1.0 || s == 0.0 || s == 1.0,
            "signal {s} at step {i} outside {{-1, 0, +1}}"
        );
    }
}
