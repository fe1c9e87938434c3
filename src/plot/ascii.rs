//! ASCII scatter plot for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - cases: `o`
//! - fitted duration line: `-`
//! - collision of both: `*`

use crate::domain::{CaseRecord, DurationModel};

/// Render the claim-value vs duration scatter with the regression overlay.
pub fn render_duration_plot(
    cases: &[CaseRecord],
    model: Option<&DurationModel>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(20);
    let height = height.max(5);

    let Some((x_min, x_max, y_min, y_max)) = bounds(cases, model) else {
        return "(no cases to plot)\n".to_string();
    };

    let mut grid = vec![vec![' '; width]; height];

    // Fitted line first so observed points draw over it.
    if let Some(model) = model {
        for col in 0..width {
            let u = col as f64 / (width - 1) as f64;
            let claim = x_min + u * (x_max - x_min);
            if let Some(row) = to_row(model.predict(claim), y_min, y_max, height) {
                grid[row][col] = '-';
            }
        }
    }

    for case in cases {
        let Some(col) = to_col(case.claim_value, x_min, x_max, width) else {
            continue;
        };
        let Some(row) = to_row(case.duration_days as f64, y_min, y_max, height) else {
            continue;
        };
        grid[row][col] = if grid[row][col] == '-' { '*' } else { 'o' };
    }

    let mut out = String::new();
    out.push_str(&format!(
        "duration (days) {:.0}..{:.0} | claim {:.0}..{:.0}\n",
        y_min, y_max, x_min, x_max
    ));
    for row in grid {
        out.push('|');
        out.extend(row);
        out.push('\n');
    }
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push('\n');
    out.push_str("legend: o case   - fitted duration   * both\n");
    out
}

fn bounds(cases: &[CaseRecord], model: Option<&DurationModel>) -> Option<(f64, f64, f64, f64)> {
    if cases.is_empty() {
        return None;
    }

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for c in cases {
        x_min = x_min.min(c.claim_value);
        x_max = x_max.max(c.claim_value);
        y_min = y_min.min(c.duration_days as f64);
        y_max = y_max.max(c.duration_days as f64);
    }
    if let Some(m) = model {
        y_min = y_min.min(m.predict(x_min)).min(m.predict(x_max));
        y_max = y_max.max(m.predict(x_min)).max(m.predict(x_max));
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }
    // Degenerate ranges still render as a single row/column.
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    Some((x_min, x_max, y_min, y_max))
}

fn to_col(x: f64, x_min: f64, x_max: f64, width: usize) -> Option<usize> {
    let u = (x - x_min) / (x_max - x_min);
    if !u.is_finite() || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(((width - 1) as f64 * u).round() as usize)
}

fn to_row(y: f64, y_min: f64, y_max: f64, height: usize) -> Option<usize> {
    let u = (y - y_min) / (y_max - y_min);
    if !u.is_finite() || !(0.0..=1.0).contains(&u) {
        return None;
    }
    // Row 0 is the top of the grid.
    Some((height - 1) - ((height - 1) as f64 * u).round() as usize)
}
