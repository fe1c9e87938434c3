//! Export enriched per-case records to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts; it is the tabular "raw data" view of the run.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::CaseRecord;
use crate::error::AppError;

/// Write the enriched batch to a CSV file.
pub fn write_cases_csv(path: &Path, cases: &[CaseRecord]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(
        file,
        "id,category,strategy,outcome,duration_days,claim_value,cost,impact,court,subject,filed_date"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for c in cases {
        writeln!(
            file,
            "{},{},{},{},{},{:.2},{:.2},{:.2},{},{},{}",
            c.id,
            quote(&c.category),
            c.strategy.display_name(),
            c.outcome,
            c.duration_days,
            c.claim_value,
            c.cost,
            c.impact,
            quote(c.court.as_deref().unwrap_or("")),
            quote(c.subject.as_deref().unwrap_or("")),
            c.filed_date.map(|d| d.to_string()).unwrap_or_default(),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

// Free-text court categories routinely contain commas.
fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
