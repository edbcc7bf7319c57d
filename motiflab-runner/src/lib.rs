//! MotifLab Runner — permutation testing, null distributions, walk-forward.
//!
//! This crate builds on `motiflab-core` to provide:
//! - Monte-Carlo permutation testing with parallel repetitions
//! - Null-distribution summaries (quantiles, CI, p-values)
//! - The sequential walk-forward driver and whole-series signal runner

pub mod distributions;
pub mod permutation;
pub mod walk_forward;

pub use distributions::NullDistribution;
pub use permutation::{permute_prices, PermutationResult, PermutationTest};
pub use walk_forward::{
    run_walk_forward, WalkForwardConfig, WalkForwardError, WalkForwardMiner,
};
