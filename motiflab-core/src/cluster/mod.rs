//! Pluggable clustering capability consumed by the miner.
//!
//! The mining, selection, and scoring logic never sees a clustering
//! algorithm; it sees this contract. The count-search heuristic and the
//! algorithm behind [`ClusterBackend::fit`] are swappable without touching
//! the engine.

mod kmeans;

pub use kmeans::KMeansSilhouette;

use rand::rngs::StdRng;
use thiserror::Error;

/// Cluster memberships and centroids in normalized-pattern space.
///
/// `clusters` partitions the input pattern indices; `centroids[c]` has the
/// same dimension as the patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub clusters: Vec<Vec<usize>>,
    pub centroids: Vec<Vec<f64>>,
}

/// Errors from the clustering capability.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("{found} patterns cannot support any cluster count in [{low}, {high}]")]
    NoViableClusterCount {
        found: usize,
        low: usize,
        high: usize,
    },
    #[error("clustering backend failed: {0}")]
    Backend(String),
}

/// Contract the miner requires of any clustering implementation.
///
/// Randomness is drawn from the caller's RNG only; a backend must not
/// touch ambient entropy. A backend may support as few as one viable
/// cluster count for a given pattern set; if it can produce none at all,
/// `recommend_cluster_count` fails and the training run aborts.
pub trait ClusterBackend {
    /// Recommend a cluster count in `[low, high]` for `patterns`.
    fn recommend_cluster_count(
        &self,
        patterns: &[Vec<f64>],
        low: usize,
        high: usize,
        rng: &mut StdRng,
    ) -> Result<usize, ClusterError>;

    /// Partition `patterns` into `k` clusters.
    fn fit(
        &self,
        patterns: &[Vec<f64>],
        k: usize,
        rng: &mut StdRng,
    ) -> Result<Clustering, ClusterError>;
}
