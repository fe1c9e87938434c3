//! CSV ingest and normalization.
//!
//! This module turns a case-list CSV into raw records that are safe to feed
//! through the filter/enrichment pipeline.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (coerce or skip bad values, but report what
//!   happened)
//! - **Separation of concerns**: no enrichment or statistics here
//!
//! Required columns: `category`, `claim_value`. Optional: `strategy`,
//! `outcome`, `duration_days`, `court`, `subject`. A non-numeric claim value
//! coerces to 0 (and is then dropped by the minimum-claim filter) instead of
//! failing the whole file.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{RawCase, Strategy};
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw records plus row diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedCases {
    pub records: Vec<RawCase>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load raw cases from a CSV file on disk.
pub fn load_cases_csv(path: &Path) -> Result<IngestedCases, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_raw_cases(file)
}

/// Read raw cases from any CSV stream (used by both disk ingest and the
/// embedded sample dataset).
pub fn read_raw_cases<R: std::io::Read>(reader: R) -> Result<IngestedCases, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV header: {e}")))?
        .clone();
    let columns = column_index(&headers);

    for required in ["category", "claim_value"] {
        if !columns.contains_key(required) {
            return Err(AppError::new(
                2,
                format!("CSV is missing the required '{required}' column."),
            ));
        }
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (i, row) in csv_reader.records().enumerate() {
        // Header is line 1; data starts at line 2.
        let line = i + 2;
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("Unreadable row: {e}"),
                });
                continue;
            }
        };
        rows_read += 1;

        records.push(parse_row(&row, &columns, line, &mut row_errors));
    }

    Ok(IngestedCases {
        records,
        row_errors,
        rows_read,
    })
}

fn column_index(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect()
}

fn parse_row(
    row: &StringRecord,
    columns: &HashMap<String, usize>,
    line: usize,
    row_errors: &mut Vec<RowError>,
) -> RawCase {
    let field = |name: &str| -> Option<&str> {
        columns
            .get(name)
            .and_then(|&i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let category = field("category").map(str::to_string);
    let court = field("court").map(str::to_string);
    let subject = field("subject").map(str::to_string);

    let claim_value = match field("claim_value") {
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            Ok(_) => 0.0,
            Err(_) => {
                row_errors.push(RowError {
                    line,
                    message: format!("Non-numeric claim value '{raw}' coerced to 0."),
                });
                0.0
            }
        },
        None => 0.0,
    };

    let duration_days = match field("duration_days") {
        Some(raw) => match raw.parse::<i64>() {
            Ok(v) if v >= 0 => Some(v),
            _ => {
                row_errors.push(RowError {
                    line,
                    message: format!("Invalid duration '{raw}' ignored."),
                });
                None
            }
        },
        None => None,
    };

    let strategy = match field("strategy") {
        Some(raw) => match Strategy::parse_label(raw) {
            Some(s) => Some(s),
            None => {
                row_errors.push(RowError {
                    line,
                    message: format!("Unknown strategy '{raw}' ignored."),
                });
                None
            }
        },
        None => None,
    };

    let outcome = match field("outcome") {
        Some(raw) => match raw.parse::<u8>() {
            Ok(v) if v <= 1 => Some(v),
            _ => {
                row_errors.push(RowError {
                    line,
                    message: format!("Outcome '{raw}' is not 0/1; ignored."),
                });
                None
            }
        },
        None => None,
    };

    RawCase {
        category,
        claim_value,
        duration_days,
        strategy,
        outcome,
        court,
        subject,
        filed_date: None,
    }
}
