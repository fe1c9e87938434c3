//! Embedded fallback dataset.
//!
//! Used when the DataJud API is unreachable or returns a batch that is empty
//! after filtering: the analysis must keep working rather than present an
//! empty screen. The records carry pre-set strategy and outcome fields, so
//! fallback runs exercise the enrichment pass-through path the same way a
//! curated CSV would.

use crate::domain::RawCase;
use crate::error::AppError;
use crate::io::ingest::read_raw_cases;

const SAMPLE_CSV: &str = "\
category,strategy,outcome,duration_days,claim_value
Recurso Especial,appeal,1,1200,500000.00
Agravo em Recurso Especial,appeal,0,800,120000.00
Embargos de Divergência,negotiate,1,350,80000.00
Recurso Especial,negotiate,1,400,250000.00
Agravo em Recurso Especial,withdraw,0,200,50000.00
Recurso Especial,appeal,1,1500,750000.00
Embargos de Divergência,negotiate,1,500,150000.00
Recurso Especial,withdraw,0,100,20000.00
Agravo em Recurso Especial,appeal,0,600,300000.00
Embargos de Divergência,negotiate,1,450,95000.00
Recurso Especial,appeal,1,1100,600000.00
Agravo em Recurso Especial,negotiate,0,700,180000.00
Embargos de Divergência,withdraw,1,250,45000.00
Recurso Especial,negotiate,1,300,350000.00
Agravo em Recurso Especial,appeal,0,180,70000.00
Recurso Especial,appeal,1,1300,850000.00
Embargos de Divergência,negotiate,1,550,170000.00
Recurso Especial,withdraw,0,150,25000.00
Agravo em Recurso Especial,appeal,0,500,320000.00
Embargos de Divergência,negotiate,1,400,105000.00
Recurso Especial,appeal,1,1400,900000.00
Agravo em Recurso Especial,negotiate,0,850,220000.00
Embargos de Divergência,withdraw,1,300,55000.00
Recurso Especial,negotiate,1,250,450000.00
Agravo em Recurso Especial,appeal,0,220,90000.00
";

/// Parse the embedded dataset through the same reader as disk CSV ingest.
pub fn sample_cases() -> Result<Vec<RawCase>, AppError> {
    let ingested = read_raw_cases(SAMPLE_CSV.as_bytes())?;
    if !ingested.row_errors.is_empty() {
        return Err(AppError::new(4, "Embedded sample dataset failed validation."));
    }
    Ok(ingested.records)
}
