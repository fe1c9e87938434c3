//! Scenario estimate for a focus strategy and a user-supplied claim value.
//!
//! This is the consumer of the regression's `predict` operation: the single
//! duration estimate shown when the user supplies a concrete claim value,
//! beside the historical success rate and the projected net impact.

use crate::domain::{AggregateRow, DurationModel, OverallStats, SimPolicy, Strategy};

/// The projected numbers for one (strategy, claim value) pair.
#[derive(Debug, Clone)]
pub struct ScenarioEstimate {
    pub strategy: Strategy,
    pub claim_value: f64,
    /// Historical success rate of the focus group, percent.
    pub success_rate: f64,
    /// `claim * success_rate - claim * cost_rate`, the probability-weighted
    /// net gain for this claim value.
    pub projected_impact: f64,
    /// Regression prediction, or the group mean when no model is available.
    pub predicted_duration_days: f64,
    /// True when the duration came from the fitted model.
    pub duration_from_model: bool,
    /// Mean duration divided by success percentage. Lower is better.
    pub risk_index: Option<f64>,

    /// Deltas against the whole filtered batch (None when the focus group is
    /// empty and there is nothing to compare).
    pub delta_success_rate: Option<f64>,
    pub delta_impact: Option<f64>,
    pub delta_duration_days: Option<f64>,
}

/// Build the estimate from the aggregate table and the (optional) model.
///
/// A focus strategy absent from the batch yields a zeroed estimate rather
/// than an error, mirroring the "never leave the user with a blank screen"
/// stance of the rest of the pipeline.
pub fn scenario_estimate(
    focus: Strategy,
    claim_value: f64,
    aggregates: &[AggregateRow],
    overall: &OverallStats,
    model: Option<&DurationModel>,
    policy: &SimPolicy,
) -> ScenarioEstimate {
    let Some(row) = aggregates.iter().find(|r| r.strategy == focus) else {
        return ScenarioEstimate {
            strategy: focus,
            claim_value,
            success_rate: 0.0,
            projected_impact: 0.0,
            predicted_duration_days: 0.0,
            duration_from_model: false,
            risk_index: None,
            delta_success_rate: None,
            delta_impact: None,
            delta_duration_days: None,
        };
    };

    let rate = row.success_rate / 100.0;
    let cost_rate = policy.cost_rates.get(focus);
    let projected_impact = claim_value * rate - claim_value * cost_rate;

    let (predicted_duration_days, duration_from_model) = match model {
        Some(m) => (m.predict(claim_value), true),
        None => (row.mean_duration_days as f64, false),
    };

    let risk_index = if row.success_rate > 0.0 {
        Some(row.mean_duration_days as f64 / row.success_rate)
    } else {
        None
    };

    ScenarioEstimate {
        strategy: focus,
        claim_value,
        success_rate: row.success_rate,
        projected_impact,
        predicted_duration_days,
        duration_from_model,
        risk_index,
        delta_success_rate: Some(row.success_rate - overall.success_rate),
        delta_impact: Some(projected_impact - overall.mean_impact),
        delta_duration_days: Some(predicted_duration_days - overall.mean_duration_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (Vec<AggregateRow>, OverallStats) {
        let aggregates = vec![
            AggregateRow {
                strategy: Strategy::Appeal,
                success_rate: 50.0,
                mean_duration_days: 1000,
                mean_impact: 234_500.0,
                case_count: 2,
            },
            AggregateRow {
                strategy: Strategy::Negotiate,
                success_rate: 100.0,
                mean_duration_days: 350,
                mean_impact: 78_400.0,
                case_count: 1,
            },
        ];
        let overall = OverallStats {
            success_rate: 66.7,
            mean_duration_days: 783.3,
            mean_impact: 182_466.67,
            case_count: 3,
        };
        (aggregates, overall)
    }

    #[test]
    fn projected_impact_weights_rate_and_cost() {
        let (aggregates, overall) = table();
        let policy = SimPolicy::default();
        let est = scenario_estimate(
            Strategy::Negotiate,
            50_000.0,
            &aggregates,
            &overall,
            None,
            &policy,
        );

        // 50000 * 1.0 - 50000 * 0.02 = 49000.
        assert!((est.projected_impact - 49_000.0).abs() < 1e-9);
        assert!((est.success_rate - 100.0).abs() < 1e-12);
    }

    #[test]
    fn duration_falls_back_to_group_mean_without_model() {
        let (aggregates, overall) = table();
        let policy = SimPolicy::default();
        let est = scenario_estimate(
            Strategy::Appeal,
            200_000.0,
            &aggregates,
            &overall,
            None,
            &policy,
        );
        assert!(!est.duration_from_model);
        assert!((est.predicted_duration_days - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn duration_uses_model_when_available() {
        let (aggregates, overall) = table();
        let policy = SimPolicy::default();
        let model = DurationModel { intercept: 100.0, slope: 0.002, n_used: 3 };
        let est = scenario_estimate(
            Strategy::Appeal,
            200_000.0,
            &aggregates,
            &overall,
            Some(&model),
            &policy,
        );
        assert!(est.duration_from_model);
        assert!((est.predicted_duration_days - 500.0).abs() < 1e-12);
    }

    #[test]
    fn missing_focus_group_yields_zeroed_estimate() {
        let (aggregates, overall) = table();
        let policy = SimPolicy::default();
        let est = scenario_estimate(
            Strategy::Withdraw,
            50_000.0,
            &aggregates,
            &overall,
            None,
            &policy,
        );
        assert_eq!(est.success_rate, 0.0);
        assert_eq!(est.projected_impact, 0.0);
        assert!(est.delta_impact.is_none());
        assert!(est.risk_index.is_none());
    }

    #[test]
    fn risk_index_is_duration_over_success_pct() {
        let (aggregates, overall) = table();
        let policy = SimPolicy::default();
        let est = scenario_estimate(
            Strategy::Appeal,
            50_000.0,
            &aggregates,
            &overall,
            None,
            &policy,
        );
        assert!((est.risk_index.unwrap() - 20.0).abs() < 1e-12);
    }
}
