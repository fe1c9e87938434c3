//! Statistical aggregation over enriched batches.
//!
//! Responsibilities:
//!
//! - minimum-claim-value filtering and per-strategy summary rows
//! - the single-predictor duration regression (with outlier trim)
//! - the scenario estimate consumed by reports and the TUI

pub mod aggregate;
pub mod regression;
pub mod scenario;

pub use aggregate::*;
pub use regression::*;
pub use scenario::*;
