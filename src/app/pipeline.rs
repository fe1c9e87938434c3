//! Shared pipeline logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! filter -> enrich -> aggregate -> regression -> scenario
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use rand::rngs::StdRng;

use crate::domain::{
    AggregateRow, CaseRecord, DurationModel, OverallStats, RawCase, RunConfig,
};
use crate::stats::scenario::ScenarioEstimate;
use crate::stats::{
    aggregate, fit_duration_model, filter_by_category, filter_raw_cases, overall_stats,
    scenario_estimate,
};

/// The batch had no usable rows after filtering.
///
/// Not an `AppError`: the caller is expected to substitute a fallback
/// dataset (or surface exit code 3 when no fallback is allowed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoData;

impl std::fmt::Display for NoData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no records above the minimum claim value")
    }
}

impl std::error::Error for NoData {}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Enriched records after all filters (the raw-data view).
    pub cases: Vec<CaseRecord>,
    pub aggregates: Vec<AggregateRow>,
    pub overall: OverallStats,
    /// `None` = model unavailable (fewer than 2 usable records).
    pub model: Option<DurationModel>,
    pub scenario: ScenarioEstimate,

    pub rows_in: usize,
    pub rows_used: usize,
}

/// Execute the full pipeline over an already-materialized batch.
///
/// The random source is injected so runs are reproducible given a seed and
/// tests can pin exact draws. Each call constructs and discards its own
/// state; nothing is shared between invocations.
pub fn run_batch(
    raw: Vec<RawCase>,
    config: &RunConfig,
    rng: &mut StdRng,
) -> Result<RunOutput, NoData> {
    let rows_in = raw.len();

    // Filter precedes enrichment: simulating fields for records that will be
    // discarded would waste draws and shift the seed stream.
    let filtered = filter_raw_cases(raw, config.policy.min_claim_value);
    if filtered.is_empty() {
        return Err(NoData);
    }

    let mut cases = crate::sim::enrich_batch(&filtered, &config.policy, rng);
    if let Some(pattern) = &config.category_filter {
        cases = filter_by_category(cases, pattern);
    }

    let Some(aggregates) = aggregate(&cases) else {
        return Err(NoData);
    };
    let overall = overall_stats(&cases).ok_or(NoData)?;
    let model = fit_duration_model(&cases, config.policy.outlier_percentile);

    let scenario = scenario_estimate(
        config.focus_strategy,
        config.scenario_claim_value,
        &aggregates,
        &overall,
        model.as_ref(),
        &config.policy,
    );

    let rows_used = cases.len();
    Ok(RunOutput {
        cases,
        aggregates,
        overall,
        model,
        scenario,
        rows_in,
        rows_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataSource, SimPolicy, Strategy};
    use rand::SeedableRng;

    fn config() -> RunConfig {
        RunConfig {
            source: DataSource::Sample,
            csv_path: None,
            policy: SimPolicy::default(),
            seed: 42,
            category_filter: None,
            focus_strategy: Strategy::Negotiate,
            scenario_claim_value: 50_000.0,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_cases: None,
            export_stats: None,
        }
    }

    fn raw(category: &str, claim: f64) -> RawCase {
        RawCase {
            category: Some(category.to_string()),
            claim_value: claim,
            ..RawCase::default()
        }
    }

    #[test]
    fn run_over_sample_produces_full_output() {
        let raw = crate::data::sample_cases().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let out = run_batch(raw, &config(), &mut rng).unwrap();

        assert_eq!(out.rows_in, 25);
        assert_eq!(out.rows_used, 25);
        assert!(!out.aggregates.is_empty());
        // 25 preset records with varied claims: the model must be available.
        assert!(out.model.is_some());
        assert!(out.scenario.duration_from_model);
    }

    #[test]
    fn all_below_minimum_is_no_data() {
        let batch = vec![raw("Recurso", 0.0), raw("Recurso", 0.5)];
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(run_batch(batch, &config(), &mut rng).unwrap_err(), NoData);
    }

    #[test]
    fn empty_batch_is_no_data() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(run_batch(Vec::new(), &config(), &mut rng).unwrap_err(), NoData);
    }

    #[test]
    fn category_filter_narrows_the_batch() {
        let raw = crate::data::sample_cases().unwrap();
        let mut cfg = config();
        cfg.category_filter = Some("embargos".into());
        let mut rng = StdRng::seed_from_u64(42);
        let out = run_batch(raw, &cfg, &mut rng).unwrap();

        assert!(out.rows_used < out.rows_in);
        assert!(out
            .cases
            .iter()
            .all(|c| c.category.to_lowercase().contains("embargos")));
    }

    #[test]
    fn filter_that_matches_nothing_is_no_data() {
        let raw = crate::data::sample_cases().unwrap();
        let mut cfg = config();
        cfg.category_filter = Some("mandado".into());
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(run_batch(raw, &cfg, &mut rng).unwrap_err(), NoData);
    }

    #[test]
    fn single_record_batch_has_no_model_but_still_aggregates() {
        let batch = vec![raw("Recurso Especial", 10_000.0)];
        let mut rng = StdRng::seed_from_u64(42);
        let mut cfg = config();
        cfg.focus_strategy = Strategy::Appeal;
        let out = run_batch(batch, &cfg, &mut rng).unwrap();

        assert!(out.model.is_none());
        assert_eq!(out.aggregates.len(), 1);
        assert!(!out.scenario.duration_from_model);
    }
}
