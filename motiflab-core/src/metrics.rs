//! Risk-adjusted performance statistics: pure functions from return series
//! to scalars. No dependencies on the miner or the clustering backend.

/// Signed value returned by [`martin_ratio`] when the equity curve has no
/// drawdown at all (Ulcer Index of zero).
pub const MARTIN_SATURATION: f64 = 1e6;

/// Drawdown floor below which the Ulcer Index is treated as zero.
const ULCER_FLOOR: f64 = 1e-12;

/// One-step-ahead return series: `r[t] = p[t+1] - p[t]`.
///
/// The final slot is 0.0; the change out of the last observed point is
/// unknown and must contribute nothing to any masked sum.
pub fn next_step_returns(prices: &[f64]) -> Vec<f64> {
    if prices.is_empty() {
        return Vec::new();
    }
    let mut returns = vec![0.0; prices.len()];
    for t in 0..prices.len() - 1 {
        returns[t] = prices[t + 1] - prices[t];
    }
    returns
}

/// Equity curve from log returns: exponentiated cumulative sum.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    let mut cumulative = 0.0;
    returns
        .iter()
        .map(|r| {
            cumulative += r;
            cumulative.exp()
        })
        .collect()
}

/// Ulcer Index: root-mean-square of relative drawdowns against the running
/// maximum of the equity curve.
pub fn ulcer_index(equity: &[f64]) -> f64 {
    if equity.is_empty() {
        return 0.0;
    }
    let mut peak = f64::NEG_INFINITY;
    let mut sum_sq = 0.0;
    for &e in equity {
        if e > peak {
            peak = e;
        }
        let dd = e / peak - 1.0;
        sum_sq += dd * dd;
    }
    (sum_sq / equity.len() as f64).sqrt()
}

/// Martin ratio: total return over Ulcer Index.
///
/// A net-negative series is scored on its negation and the result negated
/// back, so a consistently losing signal gets a symmetric negative score.
/// An equity curve with no drawdown saturates to `MARTIN_SATURATION` with
/// the appropriate sign (0.0 when the return sum is also zero).
pub fn martin_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mut total: f64 = returns.iter().sum();
    let short = total < 0.0;
    let oriented: Vec<f64> = if short {
        returns.iter().map(|r| -r).collect()
    } else {
        returns.to_vec()
    };
    if short {
        total = -total;
    }

    let equity = equity_curve(&oriented);
    let ulcer = ulcer_index(&equity);
    let martin = if ulcer < ULCER_FLOOR {
        if total == 0.0 {
            0.0
        } else {
            MARTIN_SATURATION
        }
    } else {
        total / ulcer
    };

    if short {
        -martin
    } else {
        martin
    }
}
