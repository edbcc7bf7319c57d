//! Default clustering backend: k-means with plus-plus seeding and a
//! silhouette-based cluster-count search.

use linfa::metrics::SilhouetteScore;
use linfa::prelude::*;
use linfa::DatasetBase;
use linfa_clustering::{KMeans, KMeansInit};
use linfa_nn::distance::L2Dist;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ClusterBackend, ClusterError, Clustering};

/// K-means backend. The requested count range is clamped to what the sample
/// count supports (`2 <= k <= n - 1`, the silhouette coefficient needs at
/// least one spare sample); each candidate count is fitted and scored, and
/// the best-scoring count wins.
#[derive(Debug, Clone)]
pub struct KMeansSilhouette {
    pub max_iterations: u64,
    pub tolerance: f64,
}

impl Default for KMeansSilhouette {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 1e-6,
        }
    }
}

impl KMeansSilhouette {
    fn fit_model(
        &self,
        records: &Array2<f64>,
        k: usize,
        rng: &mut StdRng,
    ) -> Result<KMeans<f64, L2Dist>, ClusterError> {
        // Child RNG per fit so the caller's stream advances once per call
        // and every fit has an independent, reproducible stream.
        let child = StdRng::seed_from_u64(rng.gen());
        let dataset = DatasetBase::from(records.clone());
        KMeans::params_with_rng(k, child)
            .init_method(KMeansInit::KMeansPlusPlus)
            .max_n_iterations(self.max_iterations)
            .tolerance(self.tolerance)
            .fit(&dataset)
            .map_err(|e| ClusterError::Backend(e.to_string()))
    }
}

impl ClusterBackend for KMeansSilhouette {
    fn recommend_cluster_count(
        &self,
        patterns: &[Vec<f64>],
        low: usize,
        high: usize,
        rng: &mut StdRng,
    ) -> Result<usize, ClusterError> {
        let n = patterns.len();
        let lo = low.max(2);
        let hi = high.min(n.saturating_sub(1));
        if lo > hi {
            return Err(ClusterError::NoViableClusterCount {
                found: n,
                low,
                high,
            });
        }

        let records = to_records(patterns);
        let mut best: Option<(usize, f64)> = None;
        for k in lo..=hi {
            let model = self.fit_model(&records, k, rng)?;
            let labels: Array1<usize> = model.predict(&records);
            let labeled = DatasetBase::new(records.clone(), labels);
            let score = match labeled.silhouette_score() {
                Ok(s) => s,
                // A count that degenerates (e.g. empty cluster) is simply
                // not a candidate.
                Err(_) => continue,
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((k, score));
            }
        }

        best.map(|(k, _)| k)
            .ok_or(ClusterError::NoViableClusterCount {
                found: n,
                low,
                high,
            })
    }

    fn fit(
        &self,
        patterns: &[Vec<f64>],
        k: usize,
        rng: &mut StdRng,
    ) -> Result<Clustering, ClusterError> {
        let records = to_records(patterns);
        let model = self.fit_model(&records, k, rng)?;
        let labels: Array1<usize> = model.predict(&records);

        let centroids = model
            .centroids()
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect();

        let mut clusters = vec![Vec::new(); k];
        for (i, &c) in labels.iter().enumerate() {
            clusters[c].push(i);
        }

        Ok(Clustering {
            clusters,
            centroids,
        })
    }
}

fn to_records(patterns: &[Vec<f64>]) -> Array2<f64> {
    let dim = patterns.first().map_or(0, |p| p.len());
    let mut records = Array2::zeros((patterns.len(), dim));
    for (i, pattern) in patterns.iter().enumerate() {
        for (j, &v) in pattern.iter().enumerate() {
            records[[i, j]] = v;
        }
    }
    records
}
