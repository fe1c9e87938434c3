//! Duration regression: ordinary least squares of duration on claim value.
//!
//! The fit runs over the filtered batch after an outlier trim (claim values
//! above a high percentile are discarded so a single enormous claim cannot
//! dominate the slope). Fewer than 2 usable records, or a batch where every
//! claim value is identical, means the model is unavailable; duration
//! prediction then falls back to the group mean (see `scenario`).

use nalgebra::{DMatrix, DVector};

use crate::domain::{CaseRecord, DurationModel};
use crate::math::solve_least_squares;

/// Fit the duration model. `None` = model unavailable.
pub fn fit_duration_model(cases: &[CaseRecord], outlier_percentile: f64) -> Option<DurationModel> {
    let claims: Vec<f64> = cases.iter().map(|c| c.claim_value).collect();
    let cutoff = percentile(&claims, outlier_percentile)?;

    let trimmed: Vec<&CaseRecord> = cases
        .iter()
        .filter(|c| c.claim_value <= cutoff)
        .collect();
    if trimmed.len() < 2 {
        return None;
    }

    // An intercept-plus-constant-predictor design is rank deficient; the SVD
    // solver would return a minimum-norm answer rather than a meaningful
    // slope, so reject it up front.
    let first = trimmed[0].claim_value;
    if trimmed.iter().all(|c| c.claim_value == first) {
        return None;
    }

    let n = trimmed.len();
    let mut design = Vec::with_capacity(n * 2);
    let mut response = Vec::with_capacity(n);
    for c in &trimmed {
        design.push(1.0);
        design.push(c.claim_value);
        response.push(c.duration_days as f64);
    }

    let x = DMatrix::from_row_slice(n, 2, &design);
    let y = DVector::from_row_slice(&response);
    let beta = solve_least_squares(&x, &y)?;

    Some(DurationModel {
        intercept: beta[0],
        slope: beta[1],
        n_used: n,
    })
}

/// Nearest-rank percentile of `values` (p in [0, 100]).
///
/// Returns `None` for an empty slice or a non-finite/out-of-range p.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !p.is_finite() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let rank = ((p / 100.0) * n as f64).ceil() as usize;
    Some(sorted[rank.clamp(1, n) - 1])
}
