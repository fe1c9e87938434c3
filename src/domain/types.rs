//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during enrichment and aggregation
//! - exported to JSON/CSV
//! - rendered by both the CLI reports and the TUI

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Category label used when the source supplies an empty or missing class.
///
/// Rule matching runs against this label like any other, so generic cases
/// always fall through to the weighted strategy draw.
pub const GENERIC_CATEGORY: &str = "Generic case";

/// One of the three litigation postures a party may take on a case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Pursue the case through appeal.
    Appeal,
    /// Seek a negotiated settlement.
    Negotiate,
    /// Withdraw the claim.
    Withdraw,
}

impl Strategy {
    /// All strategies, in reporting order.
    pub const ALL: [Strategy; 3] = [Strategy::Appeal, Strategy::Negotiate, Strategy::Withdraw];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Strategy::Appeal => "Appeal",
            Strategy::Negotiate => "Negotiate",
            Strategy::Withdraw => "Withdraw",
        }
    }

    /// Parse a label as found in CSV inputs (case-insensitive).
    pub fn parse_label(raw: &str) -> Option<Strategy> {
        match raw.trim().to_lowercase().as_str() {
            "appeal" => Some(Strategy::Appeal),
            "negotiate" => Some(Strategy::Negotiate),
            "withdraw" => Some(Strategy::Withdraw),
            _ => None,
        }
    }

    /// Cycle forward (used by the TUI focus selector).
    pub fn next(self) -> Strategy {
        match self {
            Strategy::Appeal => Strategy::Negotiate,
            Strategy::Negotiate => Strategy::Withdraw,
            Strategy::Withdraw => Strategy::Appeal,
        }
    }

    /// Cycle backward.
    pub fn prev(self) -> Strategy {
        match self {
            Strategy::Appeal => Strategy::Withdraw,
            Strategy::Negotiate => Strategy::Appeal,
            Strategy::Withdraw => Strategy::Negotiate,
        }
    }
}

/// Where case records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Try the DataJud API; fall back to the sample dataset on failure.
    Auto,
    /// DataJud API only (no fallback).
    Api,
    /// Load from a CSV file (`--csv`).
    Csv,
    /// Use the embedded sample dataset.
    Sample,
}

/// A raw case record as delivered by a source (mostly optional).
///
/// Sources differ in what they carry: the API supplies category, claim value
/// and filing date; CSV inputs may additionally carry strategy, outcome and
/// duration. Whatever is missing is filled by the enrichment stage.
#[derive(Debug, Clone, Default)]
pub struct RawCase {
    pub category: Option<String>,
    /// Non-negative monetary amount; invalid/missing inputs coerce to 0.
    pub claim_value: f64,
    pub duration_days: Option<i64>,
    pub strategy: Option<Strategy>,
    /// Binary success indicator (1 = success), when the source carries it.
    pub outcome: Option<u8>,

    pub court: Option<String>,
    pub subject: Option<String>,
    pub filed_date: Option<NaiveDate>,
}

/// An enriched case record, ready for aggregation.
#[derive(Debug, Clone)]
pub struct CaseRecord {
    pub id: String,
    pub category: String,
    pub claim_value: f64,
    pub duration_days: i64,
    pub strategy: Strategy,
    /// 1 = success, 0 = failure.
    pub outcome: u8,
    /// `claim_value * cost_rate(strategy)`.
    pub cost: f64,
    /// `claim_value - cost` on success, `-cost` on failure.
    pub impact: f64,

    pub court: Option<String>,
    pub subject: Option<String>,
    pub filed_date: Option<NaiveDate>,
}

/// Per-strategy summary statistics over a filtered, enriched batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub strategy: Strategy,
    /// Mean outcome as a percentage in [0, 100].
    pub success_rate: f64,
    /// Mean duration, rounded to the nearest day.
    pub mean_duration_days: i64,
    /// Mean net financial impact, rounded to 2 decimals.
    pub mean_impact: f64,
    pub case_count: usize,
}

/// Whole-batch means, used as the comparison baseline for scenario deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallStats {
    pub success_rate: f64,
    pub mean_duration_days: f64,
    pub mean_impact: f64,
    pub case_count: usize,
}

/// Fitted single-predictor duration model: `duration = intercept + slope * claim`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationModel {
    pub intercept: f64,
    pub slope: f64,
    /// Records used for the fit, after the outlier trim.
    pub n_used: usize,
}

impl DurationModel {
    /// Predicted duration in days, clamped to a minimum of one day.
    pub fn predict(&self, claim_value: f64) -> f64 {
        (self.intercept + self.slope * claim_value).max(1.0)
    }
}

/// One ordered enrichment rule: category substring → strategy.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    /// Lowercase substring matched against the lowercased category.
    pub pattern: String,
    pub strategy: Strategy,
}

/// A per-strategy table of rates (probabilities, cost fractions, weights).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyRates {
    pub appeal: f64,
    pub negotiate: f64,
    pub withdraw: f64,
}

impl StrategyRates {
    pub fn get(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Appeal => self.appeal,
            Strategy::Negotiate => self.negotiate,
            Strategy::Withdraw => self.withdraw,
        }
    }
}

/// The enrichment + aggregation options table.
///
/// Every observed variant of the pipeline is a special case of this
/// configuration; a concrete run picks one.
#[derive(Debug, Clone)]
pub struct SimPolicy {
    /// Ordered substring rules applied before the fallback draw.
    pub category_rules: Vec<CategoryRule>,
    /// Weights of the fallback strategy draw (need not sum to 1).
    pub fallback_weights: StrategyRates,
    /// Success probability per strategy.
    pub success_probs: StrategyRates,
    /// Procedural cost as a fraction of the claim value, per strategy.
    pub cost_rates: StrategyRates,
    /// Records below this claim value are excluded before enrichment.
    pub min_claim_value: f64,
    /// Claim values above this percentile are excluded from the regression.
    pub outlier_percentile: f64,
    /// Optional gate: an Appeal can only succeed above this claim value.
    pub appeal_value_gate: Option<f64>,
    /// Uniform fill range (days) for records with no duration.
    pub duration_fill_min: i64,
    pub duration_fill_max: i64,
}

impl Default for SimPolicy {
    fn default() -> Self {
        Self {
            category_rules: vec![
                CategoryRule { pattern: "recurso".into(), strategy: Strategy::Appeal },
                CategoryRule { pattern: "agravo".into(), strategy: Strategy::Appeal },
                CategoryRule { pattern: "embargos".into(), strategy: Strategy::Negotiate },
                CategoryRule { pattern: "conflito".into(), strategy: Strategy::Negotiate },
            ],
            fallback_weights: StrategyRates { appeal: 0.35, negotiate: 0.45, withdraw: 0.20 },
            success_probs: StrategyRates { appeal: 0.55, negotiate: 0.75, withdraw: 0.10 },
            cost_rates: StrategyRates { appeal: 0.05, negotiate: 0.02, withdraw: 0.01 },
            min_claim_value: 1.0,
            outlier_percentile: 95.0,
            appeal_value_gate: None,
            duration_fill_min: 100,
            duration_fill_max: 2000,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: DataSource,
    pub csv_path: Option<PathBuf>,

    pub policy: SimPolicy,
    pub seed: u64,

    /// Optional case-insensitive substring filter on the category.
    pub category_filter: Option<String>,
    /// Strategy under evaluation in the scenario estimate.
    pub focus_strategy: Strategy,
    /// User-supplied claim value for the scenario estimate.
    pub scenario_claim_value: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_cases: Option<PathBuf>,
    pub export_stats: Option<PathBuf>,
}

/// A saved stats file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsFile {
    pub tool: String,
    pub generated: NaiveDate,
    pub source: String,
    pub min_claim_value: f64,
    pub aggregates: Vec<AggregateRow>,
    pub regression: Option<DurationModel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_labels_round_trip() {
        for s in Strategy::ALL {
            assert_eq!(Strategy::parse_label(s.display_name()), Some(s));
        }
        assert_eq!(Strategy::parse_label("  NEGOTIATE "), Some(Strategy::Negotiate));
        assert_eq!(Strategy::parse_label("settle"), None);
    }

    #[test]
    fn strategy_cycle_covers_all() {
        let mut s = Strategy::Appeal;
        for _ in 0..3 {
            assert_eq!(s.next().prev(), s);
            s = s.next();
        }
        assert_eq!(s, Strategy::Appeal);
    }

    #[test]
    fn duration_model_predict_clamps_to_one_day() {
        let model = DurationModel { intercept: 10.0, slope: -1.0, n_used: 5 };
        assert!((model.predict(5.0) - 5.0).abs() < 1e-12);
        assert!((model.predict(100.0) - 1.0).abs() < 1e-12);
    }
}
