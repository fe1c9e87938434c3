//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the strategy enumeration and per-strategy rate tables
//! - raw and enriched case records (`RawCase`, `CaseRecord`)
//! - aggregation outputs (`AggregateRow`, `OverallStats`)
//! - run configuration (`SimPolicy`, `RunConfig`) and the stats export file

pub mod types;

pub use types::*;
