//! Input/output helpers.
//!
//! - CSV ingest + row-level validation (`ingest`)
//! - enriched per-case CSV export (`export`)
//! - stats JSON export (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
