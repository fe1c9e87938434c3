//! Stats JSON read/write.
//!
//! The stats file captures what a run computed (aggregate table + regression
//! parameters) so downstream scripts can reuse it without re-fetching.

use std::path::Path;

use crate::domain::StatsFile;
use crate::error::AppError;

/// Write a stats file as pretty-printed JSON.
pub fn write_stats_json(path: &Path, stats: &StatsFile) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(stats)
        .map_err(|e| AppError::new(4, format!("Failed to serialize stats: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        AppError::new(2, format!("Failed to write stats JSON '{}': {e}", path.display()))
    })
}

/// Read a previously exported stats file.
pub fn read_stats_json(path: &Path) -> Result<StatsFile, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::new(2, format!("Failed to read stats JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::new(2, format!("Invalid stats JSON '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregateRow, DurationModel, Strategy};
    use chrono::NaiveDate;

    #[test]
    fn stats_file_round_trips() {
        let stats = StatsFile {
            tool: "litsim".into(),
            generated: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            source: "sample".into(),
            min_claim_value: 1.0,
            aggregates: vec![AggregateRow {
                strategy: Strategy::Negotiate,
                success_rate: 75.0,
                mean_duration_days: 400,
                mean_impact: 78_400.0,
                case_count: 8,
            }],
            regression: Some(DurationModel { intercept: 120.0, slope: 0.0015, n_used: 24 }),
        };

        let dir = std::env::temp_dir();
        let path = dir.join("litsim_stats_roundtrip.json");
        write_stats_json(&path, &stats).unwrap();
        let loaded = read_stats_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.aggregates, stats.aggregates);
        assert_eq!(loaded.source, "sample");
        assert!(loaded.regression.is_some());
    }
}
