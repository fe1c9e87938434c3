//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads case records (API, CSV, or the embedded sample)
//! - runs enrichment + aggregation + regression
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::{Command, RunArgs};
use crate::domain::{
    DataSource, RawCase, RunConfig, SimPolicy, StatsFile, StrategyRates,
};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `litsim` binary.
pub fn run() -> Result<(), AppError> {
    // We want `litsim` and `litsim -c embargos` to behave like `litsim tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args, OutputMode::Full),
        Command::Table(args) => handle_run(args, OutputMode::TableOnly),
        Command::Tui(args) => crate::tui::run(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    TableOnly,
}

/// Which dataset a run actually ended up using, and why.
#[derive(Debug, Clone)]
pub struct SourceStatus {
    pub label: String,
    pub detail: String,
}

fn handle_run(args: RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let (run, source) = load_and_run(&config)?;

    if mode == OutputMode::Full {
        println!("{}", crate::report::format_run_summary(&run, &config, &source.label));
        if !source.detail.is_empty() {
            println!("Note: {}", source.detail);
        }
    }

    println!("{}", crate::report::format_aggregate_table(&run.aggregates));

    if mode == OutputMode::Full {
        println!("{}", crate::report::format_scenario(&run.scenario));

        if config.plot {
            let plot = crate::plot::render_duration_plot(
                &run.cases,
                run.model.as_ref(),
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_cases {
        crate::io::write_cases_csv(path, &run.cases)?;
    }
    if let Some(path) = &config.export_stats {
        let stats = StatsFile {
            tool: "litsim".to_string(),
            generated: chrono::Local::now().date_naive(),
            source: source.label.clone(),
            min_claim_value: config.policy.min_claim_value,
            aggregates: run.aggregates.clone(),
            regression: run.model.clone(),
        };
        crate::io::write_stats_json(path, &stats)?;
    }

    Ok(())
}

/// Load records per the configured source and run the pipeline, falling back
/// to the embedded sample when allowed.
///
/// Fallback applies on `auto` both when the API call fails and when the
/// fetched batch has no usable rows; an explicit `api`/`csv`/`sample` source
/// surfaces "no data" as exit code 3 instead.
pub fn load_and_run(
    config: &RunConfig,
) -> Result<(pipeline::RunOutput, SourceStatus), AppError> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let (raw, mut source) = load_records(config)?;
    match pipeline::run_batch(raw, config, &mut rng) {
        Ok(run) => Ok((run, source)),
        Err(no_data) if config.source == DataSource::Auto => {
            source = SourceStatus {
                label: "embedded sample (fallback)".to_string(),
                detail: format!("{}; fell back to the sample dataset", no_data),
            };
            let raw = crate::data::sample_cases()?;
            // Fresh seed stream: the fallback run must not depend on how many
            // draws the discarded batch consumed.
            let mut rng = StdRng::seed_from_u64(config.seed);
            let run = pipeline::run_batch(raw, config, &mut rng)
                .map_err(|e| AppError::new(3, format!("Sample dataset: {e}.")))?;
            Ok((run, source))
        }
        Err(no_data) => Err(AppError::new(3, format!("{}.", no_data))),
    }
}

pub(crate) fn load_records(config: &RunConfig) -> Result<(Vec<RawCase>, SourceStatus), AppError> {
    let asof = chrono::Local::now().date_naive();

    match config.source {
        DataSource::Sample => Ok((
            crate::data::sample_cases()?,
            SourceStatus { label: "embedded sample".into(), detail: String::new() },
        )),
        DataSource::Csv => {
            let path = config.csv_path.as_ref().ok_or_else(|| {
                AppError::new(2, "--source csv requires --csv <path>.")
            })?;
            let ingested = crate::io::load_cases_csv(path)?;
            let detail = if ingested.row_errors.is_empty() {
                String::new()
            } else {
                format!("{} row(s) had value problems", ingested.row_errors.len())
            };
            Ok((
                ingested.records,
                SourceStatus { label: format!("csv: {}", path.display()), detail },
            ))
        }
        DataSource::Api => {
            let client = crate::data::DatajudClient::from_env()?;
            let cases = client.fetch_cases(asof)?;
            Ok((cases, SourceStatus { label: "DataJud API".into(), detail: String::new() }))
        }
        DataSource::Auto => match try_api(asof) {
            Ok(cases) => Ok((
                cases,
                SourceStatus { label: "DataJud API".into(), detail: String::new() },
            )),
            Err(err) => Ok((
                crate::data::sample_cases()?,
                SourceStatus {
                    label: "embedded sample (fallback)".into(),
                    detail: format!("API unavailable: {err}"),
                },
            )),
        },
    }
}

fn try_api(asof: chrono::NaiveDate) -> Result<Vec<RawCase>, AppError> {
    let client = crate::data::DatajudClient::from_env()?;
    client.fetch_cases(asof)
}

/// Translate CLI flags into a run configuration.
///
/// An out-of-range outlier percentile would otherwise surface much later as
/// a silent "model unavailable", so it is rejected up front as a usage
/// error. The duration fill range clamps to non-negative days.
pub fn run_config_from_args(args: &RunArgs) -> Result<RunConfig, AppError> {
    if !args.outlier_percentile.is_finite()
        || !(0.0..=100.0).contains(&args.outlier_percentile)
    {
        return Err(AppError::new(
            2,
            format!(
                "--outlier-percentile must be in 0..=100, got {}.",
                args.outlier_percentile
            ),
        ));
    }

    let fill_min = args.fill_min.max(0);
    let policy = SimPolicy {
        fallback_weights: StrategyRates {
            appeal: args.w_appeal,
            negotiate: args.w_negotiate,
            withdraw: args.w_withdraw,
        },
        success_probs: StrategyRates {
            appeal: args.p_appeal,
            negotiate: args.p_negotiate,
            withdraw: args.p_withdraw,
        },
        cost_rates: StrategyRates {
            appeal: args.cost_appeal,
            negotiate: args.cost_negotiate,
            withdraw: args.cost_withdraw,
        },
        min_claim_value: args.min_claim_value,
        outlier_percentile: args.outlier_percentile,
        appeal_value_gate: args.appeal_gate,
        duration_fill_min: fill_min,
        duration_fill_max: args.fill_max.max(fill_min + 1),
        ..SimPolicy::default()
    };

    Ok(RunConfig {
        source: args.source,
        csv_path: args.csv.clone(),
        policy,
        seed: args.seed,
        category_filter: args.category.clone(),
        focus_strategy: args.focus,
        scenario_claim_value: args.claim_value,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_cases: args.export.clone(),
        export_stats: args.export_stats.clone(),
    })
}

/// Rewrite argv so `litsim` defaults to `litsim tui`.
///
/// Rules:
/// - `litsim`                       -> `litsim tui`
/// - `litsim -c embargos ...`       -> `litsim tui -c embargos ...`
/// - `litsim --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "table" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["litsim"])), argv(&["litsim", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["litsim", "-c", "embargos"])),
            argv(&["litsim", "tui", "-c", "embargos"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["litsim", "run", "--seed", "7"])),
            argv(&["litsim", "run", "--seed", "7"])
        );
        assert_eq!(rewrite_args(argv(&["litsim", "--help"])), argv(&["litsim", "--help"]));
    }

    fn parse_run_args(extra: &[&str]) -> RunArgs {
        use clap::Parser;
        let mut argv = vec!["litsim", "run"];
        argv.extend_from_slice(extra);
        let cli = crate::cli::Cli::parse_from(argv);
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        args
    }

    #[test]
    fn args_map_onto_the_policy_table() {
        let args = parse_run_args(&[
            "--min-claim-value",
            "1000",
            "--appeal-gate",
            "100000",
            "--p-appeal",
            "0.6",
            "--no-plot",
        ]);
        let config = run_config_from_args(&args).unwrap();

        assert_eq!(config.policy.min_claim_value, 1000.0);
        assert_eq!(config.policy.appeal_value_gate, Some(100_000.0));
        assert_eq!(config.policy.success_probs.appeal, 0.6);
        assert!(!config.plot);
    }

    #[test]
    fn negative_fill_range_clamps_to_nonnegative_days() {
        let args = parse_run_args(&["--fill-min=-50", "--fill-max=-10"]);
        let config = run_config_from_args(&args).unwrap();

        assert_eq!(config.policy.duration_fill_min, 0);
        assert!(config.policy.duration_fill_max > config.policy.duration_fill_min);
    }

    #[test]
    fn out_of_range_percentile_is_a_usage_error() {
        let args = parse_run_args(&["--outlier-percentile", "150"]);
        let err = run_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let args = parse_run_args(&["--outlier-percentile=-1"]);
        assert_eq!(run_config_from_args(&args).unwrap_err().exit_code(), 2);
    }
}
