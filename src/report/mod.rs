//! Formatted terminal output for runs.
//!
//! We keep formatting code in one place so:
//! - the enrichment/statistics code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;
