//! Perceptually important point (PIP) extraction.
//!
//! Reduces a price window to `n_pips` landmark points by greedy insertion:
//! starting from the two endpoints, repeatedly insert the interior point with
//! the largest distance from the line segment connecting its neighboring
//! selected points. Deterministic; cost O(n_pips * window length).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the distance from a candidate point to its neighboring selected
/// points is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMeasure {
    /// Sum of straight-line distances to both neighboring selected points.
    Euclidean,
    /// Shortest distance to the line through the neighboring points.
    Perpendicular,
    /// Absolute difference between the candidate price and the line's value
    /// at the candidate index.
    #[default]
    Vertical,
}

/// An ordered set of landmark points for one window.
///
/// `x` holds window-local indices (strictly increasing, endpoints fixed to
/// `0` and `window.len() - 1`), `y` the prices at those indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipSet {
    pub x: Vec<usize>,
    pub y: Vec<f64>,
}

impl PipSet {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Shift the x coordinates by `offset`, translating window-local
    /// indices into absolute series indices.
    pub fn translate(&mut self, offset: usize) {
        for x in &mut self.x {
            *x += offset;
        }
    }
}

/// Errors from PIP extraction.
#[derive(Debug, Error)]
pub enum PipError {
    #[error("n_pips = {n_pips} must be at least 3")]
    TooFewPips { n_pips: usize },
    #[error("window of {len} points cannot host {n_pips} pips")]
    WindowTooShort { len: usize, n_pips: usize },
}

/// Extract `n_pips` landmark points from `window`.
///
/// The two endpoints are always selected. Each round scans every unselected
/// index strictly between every adjacent selected pair and inserts the
/// global maximum-distance candidate; ties go to the first encountered.
pub fn find_pips(
    window: &[f64],
    n_pips: usize,
    measure: DistanceMeasure,
) -> Result<PipSet, PipError> {
    if n_pips < 3 {
        return Err(PipError::TooFewPips { n_pips });
    }
    if window.len() <= n_pips {
        return Err(PipError::WindowTooShort {
            len: window.len(),
            n_pips,
        });
    }

    let last = window.len() - 1;
    let mut xs = Vec::with_capacity(n_pips);
    let mut ys = Vec::with_capacity(n_pips);
    xs.extend([0, last]);
    ys.extend([window[0], window[last]]);

    for _ in 2..n_pips {
        // Seeded below zero so a fully flat stretch (all distances 0.0)
        // still yields an insertion point: the first interior candidate
        // wins, preserving the exactly-n_pips contract.
        let mut max_dist = -1.0_f64;
        let mut max_idx = 0usize;
        let mut insert_at = 0usize;

        for k in 0..xs.len() - 1 {
            let (left_x, right_x) = (xs[k], xs[k + 1]);
            let (left_y, right_y) = (ys[k], ys[k + 1]);
            let slope = (right_y - left_y) / (right_x - left_x) as f64;
            let intercept = left_y - left_x as f64 * slope;

            for i in left_x + 1..right_x {
                let d = match measure {
                    DistanceMeasure::Euclidean => {
                        let dl = ((left_x as f64 - i as f64).powi(2)
                            + (left_y - window[i]).powi(2))
                        .sqrt();
                        let dr = ((right_x as f64 - i as f64).powi(2)
                            + (right_y - window[i]).powi(2))
                        .sqrt();
                        dl + dr
                    }
                    DistanceMeasure::Perpendicular => {
                        (slope * i as f64 + intercept - window[i]).abs()
                            / (slope * slope + 1.0).sqrt()
                    }
                    DistanceMeasure::Vertical => {
                        (slope * i as f64 + intercept - window[i]).abs()
                    }
                };

                if d > max_dist {
                    max_dist = d;
                    max_idx = i;
                    insert_at = k + 1;
                }
            }
        }

        xs.insert(insert_at, max_idx);
        ys.insert(insert_at, window[max_idx]);
    }

    Ok(PipSet { x: xs, y: ys })
}
