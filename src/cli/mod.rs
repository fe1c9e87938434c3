//! Command-line parsing for the case strategy simulator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the enrichment/statistics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DataSource, Strategy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "litsim", version, about = "Litigation strategy simulator (DataJud-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch/load cases, enrich, aggregate, print the full report.
    Run(RunArgs),
    /// Print the per-strategy table only (useful for scripting).
    Table(RunArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `litsim run`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(RunArgs),
}

/// Common options for running the pipeline.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Data source (auto = API with sample fallback).
    #[arg(short = 's', long, value_enum, default_value_t = DataSource::Auto)]
    pub source: DataSource,

    /// CSV file with case records (required for --source csv).
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Random seed for strategy/outcome draws (reproducible runs).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Exclude records with a claim value below this amount.
    #[arg(long, default_value_t = 1.0)]
    pub min_claim_value: f64,

    /// Discard claim values above this percentile before the regression.
    #[arg(long, default_value_t = 95.0)]
    pub outlier_percentile: f64,

    /// Appeals can only succeed above this claim value (off by default).
    #[arg(long)]
    pub appeal_gate: Option<f64>,

    /// Success probability for Appeal.
    #[arg(long, default_value_t = 0.55)]
    pub p_appeal: f64,

    /// Success probability for Negotiate.
    #[arg(long, default_value_t = 0.75)]
    pub p_negotiate: f64,

    /// Success probability for Withdraw.
    #[arg(long, default_value_t = 0.10)]
    pub p_withdraw: f64,

    /// Procedural cost rate for Appeal (fraction of the claim).
    #[arg(long, default_value_t = 0.05)]
    pub cost_appeal: f64,

    /// Procedural cost rate for Negotiate.
    #[arg(long, default_value_t = 0.02)]
    pub cost_negotiate: f64,

    /// Procedural cost rate for Withdraw.
    #[arg(long, default_value_t = 0.01)]
    pub cost_withdraw: f64,

    /// Fallback draw weight for Appeal (categories with no rule match).
    #[arg(long, default_value_t = 0.35)]
    pub w_appeal: f64,

    /// Fallback draw weight for Negotiate.
    #[arg(long, default_value_t = 0.45)]
    pub w_negotiate: f64,

    /// Fallback draw weight for Withdraw.
    #[arg(long, default_value_t = 0.20)]
    pub w_withdraw: f64,

    /// Lower bound (days) for filling missing durations.
    #[arg(long, default_value_t = 100)]
    pub fill_min: i64,

    /// Upper bound (days, exclusive) for filling missing durations.
    #[arg(long, default_value_t = 2000)]
    pub fill_max: i64,

    /// Only analyze categories containing this substring.
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// Strategy under evaluation in the scenario estimate.
    #[arg(short = 'f', long, value_enum, default_value_t = Strategy::Negotiate)]
    pub focus: Strategy,

    /// Claim value for the scenario estimate.
    #[arg(long, default_value_t = 50_000.0)]
    pub claim_value: f64,

    /// Disable the terminal plot (rendered by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the enriched per-case table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the aggregate table + regression to JSON.
    #[arg(long = "export-stats")]
    pub export_stats: Option<PathBuf>,
}
