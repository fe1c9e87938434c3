//! Simulation of strategy and outcome for records that lack them.
//!
//! Responsibilities:
//!
//! - classify the category against the ordered rule list
//! - draw strategy/outcome from the configured distributions
//! - fill missing durations and derive cost/impact

pub mod enrich;

pub use enrich::*;
