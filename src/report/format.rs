//! Reporting utilities: run summary, aggregate table, scenario block.

use crate::app::pipeline::RunOutput;
use crate::domain::{AggregateRow, RunConfig};
use crate::stats::scenario::ScenarioEstimate;

/// Format the full run summary (source, filters, regression diagnostics).
pub fn format_run_summary(output: &RunOutput, config: &RunConfig, source_label: &str) -> String {
    let mut out = String::new();

    out.push_str("=== litsim - Case Strategy Simulator ===\n");
    out.push_str(&format!("Source: {source_label}\n"));
    out.push_str(&format!(
        "Cases: {} in | {} used | min claim = {}\n",
        output.rows_in,
        output.rows_used,
        fmt_money(config.policy.min_claim_value),
    ));
    if let Some(filter) = &config.category_filter {
        out.push_str(&format!("Category filter: '{filter}'\n"));
    }
    out.push_str(&format!("Seed: {}\n", config.seed));

    out.push_str("\nDuration regression (duration ~ claim value):\n");
    match &output.model {
        Some(m) => out.push_str(&format!(
            "- duration = {:.2} + {:.6} * claim | n={} (trim at p{})\n",
            m.intercept, m.slope, m.n_used, config.policy.outlier_percentile,
        )),
        None => out.push_str(
            "- model unavailable (fewer than 2 usable records); scenario falls back to group means\n",
        ),
    }

    out
}

/// Format the per-strategy comparison table.
pub fn format_aggregate_table(rows: &[AggregateRow]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<12} {:>10} {:>14} {:>16} {:>8}\n",
        "strategy", "success", "avg duration", "avg impact", "cases"
    ));
    out.push_str(&format!(
        "{:-<12} {:-<10} {:-<14} {:-<16} {:-<8}\n",
        "", "", "", "", ""
    ));

    for row in rows {
        out.push_str(&format!(
            "{:<12} {:>9.1}% {:>9} days {:>16} {:>8}\n",
            row.strategy.display_name(),
            row.success_rate,
            row.mean_duration_days,
            fmt_money(row.mean_impact),
            row.case_count,
        ));
    }

    out
}

/// Format the scenario block (the numbers that react to the user's input).
pub fn format_scenario(scenario: &ScenarioEstimate) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Scenario: {} at claim value {}\n",
        scenario.strategy.display_name(),
        fmt_money(scenario.claim_value),
    ));

    if scenario.delta_success_rate.is_none() {
        out.push_str("- no historical cases for this strategy in the current sample\n");
        return out;
    }

    out.push_str(&format!(
        "- success probability : {:>7.1}%{}\n",
        scenario.success_rate,
        fmt_delta(scenario.delta_success_rate, "% vs. sample mean"),
    ));
    out.push_str(&format!(
        "- projected net impact: {:>12}{}\n",
        fmt_money(scenario.projected_impact),
        fmt_delta(scenario.delta_impact, " vs. sample mean"),
    ));
    out.push_str(&format!(
        "- expected duration   : {:>7.0} days ({}){}\n",
        scenario.predicted_duration_days,
        if scenario.duration_from_model {
            "regression"
        } else {
            "group mean"
        },
        fmt_delta(scenario.delta_duration_days, " days vs. sample mean"),
    ));
    if let Some(risk) = scenario.risk_index {
        out.push_str(&format!("- risk index          : {risk:>7.1} (days per success point)\n"));
    }

    out
}

/// Monetary amount with thousands separators, two decimals.
pub fn fmt_money(v: f64) -> String {
    let negative = v < 0.0;
    let cents = (v.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac:02}")
}

fn fmt_delta(delta: Option<f64>, suffix: &str) -> String {
    match delta {
        Some(d) => format!("  ({d:+.1}{suffix})"),
        None => String::new(),
    }
}
