//! Pattern mining engine.
//!
//! One training run: collect unique normalized PIP patterns over a price
//! series, cluster them through the [`ClusterBackend`] capability, turn each
//! cluster into an occupancy series, score clusters by the Martin ratio of
//! their masked forward returns, select the best long and short clusters,
//! and score the combined strategy. `train` is a pure function producing an
//! immutable [`MinerState`]; nothing carries over between calls.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cluster::{ClusterBackend, ClusterError};
use crate::metrics::{martin_ratio, next_step_returns};
use crate::patterns::{collect_unique_patterns, zscore, Pattern};
use crate::pips::{DistanceMeasure, PipError};

/// Parameters of one mining run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Landmark points per window.
    pub n_pips: usize,
    /// Trailing window length for pattern extraction.
    pub lookback: usize,
    /// Steps an occurrence stays active in the occupancy series.
    pub hold_period: usize,
    /// Distance measure for PIP extraction.
    pub distance: DistanceMeasure,
    /// Inclusive bounds for the cluster-count search.
    pub cluster_count_range: (usize, usize),
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            n_pips: 5,
            lookback: 24,
            hold_period: 6,
            distance: DistanceMeasure::Vertical,
            cluster_count_range: (5, 40),
        }
    }
}

impl MinerConfig {
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.n_pips < 3 {
            return Err(MinerError::InvalidConfig(format!(
                "n_pips = {} must be at least 3",
                self.n_pips
            )));
        }
        if self.lookback <= self.n_pips {
            return Err(MinerError::InvalidConfig(format!(
                "lookback = {} must exceed n_pips = {}",
                self.lookback, self.n_pips
            )));
        }
        let (low, high) = self.cluster_count_range;
        if low < 2 || low > high {
            return Err(MinerError::InvalidConfig(format!(
                "cluster count range [{low}, {high}] is not a valid search range"
            )));
        }
        Ok(())
    }
}

/// Errors from training.
#[derive(Debug, Error)]
pub enum MinerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Pip(#[from] PipError),
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

/// Immutable artifact of one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinerState {
    config: MinerConfig,
    patterns: Vec<Pattern>,
    clusters: Vec<Vec<usize>>,
    centroids: Vec<Vec<f64>>,
    occupancy: Vec<Vec<f64>>,
    selected_long: Vec<usize>,
    selected_short: Vec<usize>,
    fit_martin: f64,
}

impl MinerState {
    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    /// Per-cluster occupancy series, aligned with the training series.
    pub fn occupancy(&self) -> &[Vec<f64>] {
        &self.occupancy
    }

    pub fn selected_long(&self) -> &[usize] {
        &self.selected_long
    }

    pub fn selected_short(&self) -> &[usize] {
        &self.selected_short
    }

    /// Aggregate Martin ratio of the combined long/short strategy over the
    /// training series.
    pub fn fit_martin(&self) -> f64 {
        self.fit_martin
    }

    /// Classify a raw PIP price vector and map it to a signal direction.
    ///
    /// Always one of {-1.0, 0.0, +1.0}: +1.0 when the nearest centroid is a
    /// selected long cluster, -1.0 when selected short, 0.0 otherwise.
    /// Degenerate (flat) input and the no-centroid state are neutral.
    pub fn predict(&self, pip_prices: &[f64]) -> f64 {
        let Some(vector) = zscore(pip_prices) else {
            return 0.0;
        };
        if self.centroids.is_empty() {
            return 0.0;
        }

        let mut best = 0usize;
        let mut best_dist = f64::INFINITY;
        for (c, centroid) in self.centroids.iter().enumerate() {
            let dist = vector
                .iter()
                .zip(centroid)
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt();
            if dist < best_dist {
                best_dist = dist;
                best = c;
            }
        }

        if self.selected_long.contains(&best) {
            1.0
        } else if self.selected_short.contains(&best) {
            -1.0
        } else {
            0.0
        }
    }
}

/// Run one full mining pass over `data`.
///
/// Fails without partial state when the configuration is invalid or the
/// backend cannot produce any viable cluster count for the mined patterns.
pub fn train<B: ClusterBackend>(
    data: &[f64],
    config: &MinerConfig,
    backend: &B,
    seed: u64,
) -> Result<MinerState, MinerError> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);

    let patterns = collect_unique_patterns(
        data,
        config.n_pips,
        config.lookback,
        config.hold_period,
        config.distance,
    )?;
    let vectors: Vec<Vec<f64>> = patterns.iter().map(|p| p.vector.clone()).collect();

    let (low, high) = config.cluster_count_range;
    let k = backend.recommend_cluster_count(&vectors, low, high, &mut rng)?;
    let clustering = backend.fit(&vectors, k, &mut rng)?;
    if clustering.clusters.is_empty() {
        return Err(ClusterError::Backend("backend returned no clusters".to_string()).into());
    }

    let occupancy = build_occupancy(&clustering.clusters, &patterns, data.len(), config.hold_period);
    let returns = next_step_returns(data);
    let (selected_long, selected_short) = select_clusters(&occupancy, &returns);
    let fit_martin = aggregate_martin(&occupancy, &selected_long, &selected_short, &returns);

    Ok(MinerState {
        config: config.clone(),
        patterns,
        clusters: clustering.clusters,
        centroids: clustering.centroids,
        occupancy,
        selected_long,
        selected_short,
        fit_martin,
    })
}

/// Indicator series per cluster: 1.0 for `hold_period` steps after each
/// member occurrence. Overlapping occurrences clamp to 1.0.
fn build_occupancy(
    clusters: &[Vec<usize>],
    patterns: &[Pattern],
    len: usize,
    hold_period: usize,
) -> Vec<Vec<f64>> {
    clusters
        .iter()
        .map(|members| {
            let mut series = vec![0.0; len];
            for &m in members {
                let start = patterns[m].origin;
                let end = (start + hold_period).min(len);
                for slot in &mut series[start..end] {
                    *slot = 1.0;
                }
            }
            series
        })
        .collect()
}

/// Best long and best short cluster by masked-return Martin ratio.
///
/// Ties go to the first encountered extremum; the two selections are
/// independent and may name the same cluster.
fn select_clusters(occupancy: &[Vec<f64>], returns: &[f64]) -> (Vec<usize>, Vec<usize>) {
    let mut best_long = 0usize;
    let mut best_short = 0usize;
    let mut max_martin = f64::NEG_INFINITY;
    let mut min_martin = f64::INFINITY;

    for (c, series) in occupancy.iter().enumerate() {
        let masked: Vec<f64> = series.iter().zip(returns).map(|(s, r)| s * r).collect();
        let martin = martin_ratio(&masked);
        if martin > max_martin {
            max_martin = martin;
            best_long = c;
        }
        if martin < min_martin {
            min_martin = martin;
            best_short = c;
        }
    }

    (vec![best_long], vec![best_short])
}

/// Martin ratio of the combined strategy: mean selected-long occupancy
/// minus mean selected-short occupancy, times the forward returns.
fn aggregate_martin(
    occupancy: &[Vec<f64>],
    selected_long: &[usize],
    selected_short: &[usize],
    returns: &[f64],
) -> f64 {
    let n = returns.len();
    let mut long = vec![0.0; n];
    let mut short = vec![0.0; n];

    for &c in selected_long {
        for (slot, v) in long.iter_mut().zip(&occupancy[c]) {
            *slot += v;
        }
    }
    for &c in selected_short {
        for (slot, v) in short.iter_mut().zip(&occupancy[c]) {
            *slot += v;
        }
    }

    let long_count = selected_long.len().max(1) as f64;
    let short_count = selected_short.len().max(1) as f64;
    let combined: Vec<f64> = (0..n)
        .map(|t| (long[t] / long_count - short[t] / short_count) * returns[t])
        .collect();

    martin_ratio(&combined)
}
