//! Sliding-window collection of unique, normalized PIP patterns.
//!
//! A window whose internal PIP placement matches the immediately previous
//! window's is a duplicate and is discarded; survivors are z-score
//! normalized so clustering compares shape, not level.

use serde::{Deserialize, Serialize};

use crate::pips::{find_pips, DistanceMeasure, PipError};

/// Variance floor below which a PIP set is considered flat and cannot be
/// normalized.
const VARIANCE_FLOOR: f64 = 1e-24;

/// One mined shape: the z-score normalized PIP prices of a window, tagged
/// with the absolute index of the window's right edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Normalized PIP prices, length `n_pips`, mean 0 and unit standard
    /// deviation.
    pub vector: Vec<f64>,
    /// Index into the source series of the last point of the producing
    /// window.
    pub origin: usize,
}

/// Z-score normalize `values` (population standard deviation).
///
/// Returns `None` when the variance is below the floor; a flat PIP set has
/// no shape and must not produce a NaN vector.
pub fn zscore(values: &[f64]) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if variance < VARIANCE_FLOOR {
        return None;
    }
    let std = variance.sqrt();
    Some(values.iter().map(|v| (v - mean) / std).collect())
}

/// Slide a `lookback`-length window across `data` and collect the unique
/// normalized patterns.
///
/// Windows end at indices `lookback - 1 ..= data.len() - hold_period - 1`,
/// so every emitted pattern leaves room for its full hold period. Origins
/// are strictly increasing by construction.
pub fn collect_unique_patterns(
    data: &[f64],
    n_pips: usize,
    lookback: usize,
    hold_period: usize,
    measure: DistanceMeasure,
) -> Result<Vec<Pattern>, PipError> {
    let mut patterns = Vec::new();
    let end = data.len().saturating_sub(hold_period);
    if lookback == 0 || lookback > end {
        return Ok(patterns);
    }

    let mut last_x = vec![0usize; n_pips];
    for i in lookback - 1..end {
        let start = i + 1 - lookback;
        let mut pips = find_pips(&data[start..=i], n_pips, measure)?;
        pips.translate(start);

        let same = pips.x[1..n_pips - 1] == last_x[1..n_pips - 1];
        if !same {
            if let Some(vector) = zscore(&pips.y) {
                patterns.push(Pattern { vector, origin: i });
            }
        }
        last_x = pips.x;
    }

    Ok(patterns)
}
