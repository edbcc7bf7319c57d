//! Monte-Carlo permutation test for mined-signal significance.
//!
//! Shuffling the one-step price differences destroys serial structure while
//! preserving the marginal distribution of steps. Re-mining each shuffled
//! surrogate end-to-end yields a null distribution of fit Martin ratios
//! against which the real fit is judged.
//!
//! Repetitions are embarrassingly parallel: each gets its own surrogate
//! series, a fresh miner state, and a hash-derived sub-seed, so results are
//! identical regardless of thread count or completion order.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use motiflab_core::cluster::ClusterBackend;
use motiflab_core::miner::{self, MinerConfig};
use motiflab_core::seeds::SeedHierarchy;

use crate::distributions::NullDistribution;

/// Monte-Carlo permutation test over one price series.
#[derive(Debug, Clone)]
pub struct PermutationTest {
    /// Number of shuffled repetitions.
    n_reps: usize,
    /// Master seed; every repetition derives its own sub-seed.
    seed: u64,
}

/// Observed fit plus the null distribution of permuted fits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermutationResult {
    pub observed_martin: f64,
    pub null_martins: Vec<f64>,
}

impl PermutationTest {
    pub fn new(n_reps: usize, seed: u64) -> Self {
        assert!(n_reps > 0, "n_reps must be > 0");
        Self { n_reps, seed }
    }

    /// Train on the real series, then on `n_reps` shuffled surrogates.
    ///
    /// Any repetition that cannot be mined (configuration is identical, so
    /// this means the surrogate lost too many unique patterns) aborts the
    /// whole test; a partial null distribution would bias the quantiles.
    pub fn run<B: ClusterBackend + Sync>(
        &self,
        data: &[f64],
        config: &MinerConfig,
        backend: &B,
    ) -> Result<PermutationResult> {
        let seeds = SeedHierarchy::new(self.seed);

        let observed = miner::train(data, config, backend, seeds.sub_seed("train", 0))?;

        let null_martins = (0..self.n_reps)
            .into_par_iter()
            .map(|rep| {
                let mut rng = seeds.rng_for("permutation-shuffle", rep as u64);
                let surrogate = permute_prices(data, &mut rng);
                let train_seed = seeds.sub_seed("permutation-train", rep as u64);
                miner::train(&surrogate, config, backend, train_seed)
                    .map(|state| state.fit_martin())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PermutationResult {
            observed_martin: observed.fit_martin(),
            null_martins,
        })
    }
}

impl PermutationResult {
    /// Fraction of null repetitions at or above the observed fit.
    pub fn p_value(&self) -> f64 {
        if self.null_martins.is_empty() {
            return 1.0;
        }
        let at_or_above = self
            .null_martins
            .iter()
            .filter(|&&m| m >= self.observed_martin)
            .count();
        at_or_above as f64 / self.null_martins.len() as f64
    }

    /// Percentile rank of the observed fit within the null (0.0..=1.0).
    pub fn percentile_rank(&self) -> f64 {
        if self.null_martins.is_empty() {
            return 0.0;
        }
        let below = self
            .null_martins
            .iter()
            .filter(|&&m| m < self.observed_martin)
            .count();
        below as f64 / self.null_martins.len() as f64
    }

    /// Summary statistics of the null distribution.
    pub fn summary(&self) -> NullDistribution {
        NullDistribution::from_values(&self.null_martins)
    }
}

/// Build a surrogate series: shuffle the consecutive differences and
/// cumulative-sum them back from the original first value.
pub fn permute_prices(data: &[f64], rng: &mut StdRng) -> Vec<f64> {
    if data.len() < 2 {
        return data.to_vec();
    }

    let mut diffs: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
    diffs.shuffle(rng);

    let mut surrogate = Vec::with_capacity(data.len());
    let mut level = data[0];
    surrogate.push(level);
    for d in diffs {
        level += d;
        surrogate.push(level);
    }
    surrogate
}
