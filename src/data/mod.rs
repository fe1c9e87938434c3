//! Data sources for case records.
//!
//! - `datajud`: blocking client for the public DataJud search API
//! - `sample`: embedded fallback dataset used when the API is unavailable

pub mod datajud;
pub mod sample;

pub use datajud::*;
pub use sample::*;
