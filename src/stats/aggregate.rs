//! Per-strategy summary statistics.
//!
//! Aggregation is deterministic given an enriched batch: re-running it on the
//! same records yields identical rows. The "no data" condition (empty batch)
//! is reported as `None`, never as a panic or an error; the caller decides
//! whether to fall back to another dataset.

use crate::domain::{AggregateRow, CaseRecord, OverallStats, RawCase, Strategy};

/// Drop records whose claim value is below the configured minimum.
///
/// This runs *before* enrichment: zero-value records (including coerced
/// non-numeric inputs) self-resolve to exclusion rather than failure.
pub fn filter_raw_cases(raw: Vec<RawCase>, min_claim_value: f64) -> Vec<RawCase> {
    raw.into_iter()
        .filter(|c| c.claim_value >= min_claim_value)
        .collect()
}

/// Group by strategy and summarize. `None` when the batch is empty.
///
/// Rows appear in `Strategy::ALL` order; strategies with zero members do not
/// appear at all, so every row has `case_count >= 1`.
pub fn aggregate(cases: &[CaseRecord]) -> Option<Vec<AggregateRow>> {
    if cases.is_empty() {
        return None;
    }

    let mut rows = Vec::with_capacity(Strategy::ALL.len());
    for strategy in Strategy::ALL {
        let group: Vec<&CaseRecord> = cases.iter().filter(|c| c.strategy == strategy).collect();
        if group.is_empty() {
            continue;
        }

        let n = group.len() as f64;
        let success_rate =
            group.iter().map(|c| f64::from(c.outcome)).sum::<f64>() / n * 100.0;
        let mean_duration =
            group.iter().map(|c| c.duration_days as f64).sum::<f64>() / n;
        let mean_impact = group.iter().map(|c| c.impact).sum::<f64>() / n;

        rows.push(AggregateRow {
            strategy,
            success_rate,
            mean_duration_days: mean_duration.round() as i64,
            mean_impact: (mean_impact * 100.0).round() / 100.0,
            case_count: group.len(),
        });
    }

    Some(rows)
}

/// Whole-batch means, the baseline for scenario deltas.
pub fn overall_stats(cases: &[CaseRecord]) -> Option<OverallStats> {
    if cases.is_empty() {
        return None;
    }
    let n = cases.len() as f64;
    Some(OverallStats {
        success_rate: cases.iter().map(|c| f64::from(c.outcome)).sum::<f64>() / n * 100.0,
        mean_duration_days: cases.iter().map(|c| c.duration_days as f64).sum::<f64>() / n,
        mean_impact: cases.iter().map(|c| c.impact).sum::<f64>() / n,
        case_count: cases.len(),
    })
}

/// Case-insensitive substring filter on the category.
pub fn filter_by_category(cases: Vec<CaseRecord>, pattern: &str) -> Vec<CaseRecord> {
    let needle = pattern.to_lowercase();
    cases
        .into_iter()
        .filter(|c| c.category.to_lowercase().contains(&needle))
        .collect()
}
