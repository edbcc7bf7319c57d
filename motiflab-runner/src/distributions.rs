//! Summary statistics for permutation null distributions.
//!
//! Point estimates hide how wide the null is; keeping the quantile table
//! and the raw values lets callers report confidence bands and histograms.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Distribution of fit Martin ratios across permutation repetitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NullDistribution {
    pub mean: f64,
    /// Median (50th percentile).
    pub median: f64,
    /// Interquartile range (Q3 - Q1).
    pub iqr: f64,
    /// Percentiles (p2.5, p10, p25, p50, p75, p90, p95, p97.5).
    pub percentiles: HashMap<String, f64>,
    /// All repetition values.
    pub all_values: Vec<f64>,
}

impl NullDistribution {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                mean: 0.0,
                median: 0.0,
                iqr: 0.0,
                percentiles: HashMap::new(),
                all_values: Vec::new(),
            };
        }

        let median = percentile(values, 0.5);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let q1 = percentile(values, 0.25);
        let q3 = percentile(values, 0.75);

        let mut percentiles = HashMap::new();
        percentiles.insert("p2.5".to_string(), percentile(values, 0.025));
        percentiles.insert("p10".to_string(), percentile(values, 0.10));
        percentiles.insert("p25".to_string(), q1);
        percentiles.insert("p50".to_string(), median);
        percentiles.insert("p75".to_string(), q3);
        percentiles.insert("p90".to_string(), percentile(values, 0.90));
        percentiles.insert("p95".to_string(), percentile(values, 0.95));
        percentiles.insert("p97.5".to_string(), percentile(values, 0.975));

        Self {
            mean,
            median,
            iqr: q3 - q1,
            percentiles,
            all_values: values.to_vec(),
        }
    }

    pub fn get_percentile(&self, p: &str) -> Option<f64> {
        self.percentiles.get(p).copied()
    }

    pub fn std_dev(&self) -> f64 {
        if self.all_values.is_empty() {
            return 0.0;
        }
        let variance = self
            .all_values
            .iter()
            .map(|v| (v - self.mean).powi(2))
            .sum::<f64>()
            / self.all_values.len() as f64;
        variance.sqrt()
    }

    /// The 95% band (p2.5, p97.5); `None` below 2 values.
    pub fn ci_95(&self) -> Option<(f64, f64)> {
        if self.all_values.len() < 2 {
            return None;
        }
        let lower = self.percentiles.get("p2.5").copied()?;
        let upper = self.percentiles.get("p97.5").copied()?;
        Some((lower, upper))
    }

    pub fn range(&self) -> (f64, f64) {
        if self.all_values.is_empty() {
            return (0.0, 0.0);
        }
        let mut values = self.all_values.clone();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        (*values.first().unwrap(), *values.last().unwrap())
    }
}

/// Nearest-rank percentile over an unsorted slice.
pub(crate) fn percentile(values: &[f64], p: f64) -> f64 {
    assert!((0.0..=1.0).contains(&p), "percentile must be in [0, 1]");
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = (p * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx]
}
