//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    DEFAULT_DATA_DIR, EXPOSURE_SECTION, REPORT_SECTION, active_count, validate_dates,
    validate_seed, validate_systems, validate_top_trades,
};
use crate::domain::error::ExposureError;
use crate::domain::market::Instrument;
use crate::domain::pipeline::{ExposureConfig, ExposureReport, run_from_port};
use crate::domain::signal::{SignalSystem, parse_systems};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "exposure",
    about = "Composite market-exposure signal engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate the signal systems and report the recommended exposure
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated system names; overrides the config
        #[arg(long)]
        systems: Option<String>,
        /// Enable the first N systems; overrides the config
        #[arg(long)]
        active: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of recent trades to print
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        top: Option<u64>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List the signal systems with their rules and indicators
    Systems,
    /// Validate an exposure configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range of each instrument feed
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Run-time overrides taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct RunOverrides {
    pub systems: Option<String>,
    pub active: Option<u64>,
    pub output: Option<PathBuf>,
    pub top: Option<u64>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            systems,
            active,
            output,
            top,
            dry_run,
        } => {
            let overrides = RunOverrides {
                systems,
                active,
                output,
                top,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_exposure(&config, &overrides)
            }
        }
        Command::Systems => {
            print!("{}", format_systems());
            ExitCode::SUCCESS
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    }
}

fn fail(err: &ExposureError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

/// Builds the run configuration from the `[exposure]` section.
pub fn build_exposure_config(adapter: &dyn ConfigPort) -> Result<ExposureConfig, ExposureError> {
    let (start_date, end_date) = validate_dates(adapter)?;
    Ok(ExposureConfig {
        start_date,
        end_date,
        systems: validate_systems(adapter)?,
        top_trades: validate_top_trades(adapter)?,
        pseudo_return_seed: validate_seed(adapter)?,
    })
}

/// Enabled systems: `--systems` beats `--active`, which beats the config.
/// The config's selection is only read when neither flag is given.
pub fn resolve_systems(
    systems_override: Option<&str>,
    active_override: Option<u64>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<SignalSystem>, ExposureError> {
    if let Some(raw) = systems_override {
        let systems = parse_systems(raw)?;
        if systems.is_empty() {
            return Err(ExposureError::ConfigInvalid {
                section: "cli".into(),
                key: "systems".into(),
                reason: "--systems must name at least one system".into(),
            });
        }
        return Ok(systems);
    }
    if let Some(n) = active_override {
        let count = i64::try_from(n).unwrap_or(i64::MAX);
        return active_count(count).map(SignalSystem::first);
    }
    validate_systems(adapter)
}

/// Builds the run configuration with command-line overrides applied. A key
/// that is overridden is not validated from the config.
pub fn build_run_config(
    adapter: &dyn ConfigPort,
    overrides: &RunOverrides,
) -> Result<ExposureConfig, ExposureError> {
    let (start_date, end_date) = validate_dates(adapter)?;
    let systems = resolve_systems(overrides.systems.as_deref(), overrides.active, adapter)?;
    let top_trades = match overrides.top {
        Some(top) => usize::try_from(top).unwrap_or(usize::MAX),
        None => validate_top_trades(adapter)?,
    };
    Ok(ExposureConfig {
        start_date,
        end_date,
        systems,
        top_trades,
        pseudo_return_seed: validate_seed(adapter)?,
    })
}

pub fn data_dir(adapter: &dyn ConfigPort) -> PathBuf {
    adapter
        .get_string(EXPOSURE_SECTION, "data_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn output_dir(override_path: Option<&Path>, adapter: &dyn ConfigPort) -> Option<PathBuf> {
    override_path
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string(REPORT_SECTION, "output_dir").map(PathBuf::from))
}

fn run_exposure(config_path: &Path, overrides: &RunOverrides) -> ExitCode {
    // Stage 1: Load config
    tracing::info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate and build run config
    let config = match build_run_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    // Stages 3-5: Data port dependent pipeline
    let data_port = CsvAdapter::new(data_dir(&adapter));
    let output = output_dir(overrides.output.as_deref(), &adapter);
    run_pipeline(&data_port, &config, output.as_deref())
}

/// Fetches, evaluates, prints the summary and writes the report files.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    config: &ExposureConfig,
    output: Option<&Path>,
) -> ExitCode {
    // Stage 3: Fetch, align and evaluate
    tracing::info!(
        start = %config.start_date,
        end = %config.end_date,
        systems = config.systems.len(),
        "running exposure"
    );
    let report = match run_from_port(data_port, config) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    // Stage 4: Console summary
    print!("{}", format_summary(&report));

    // Stage 5: Report files
    if let Some(dir) = output {
        if let Err(e) = CsvReportAdapter::new().write(&report, dir) {
            return fail(&e);
        }
        eprintln!("\nReport written to: {}", dir.display());
    }

    ExitCode::SUCCESS
}

fn fmt_close(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_summary(report: &ExposureReport) -> String {
    let mut out = String::new();
    let enabled: Vec<&str> = report.enabled.iter().map(|s| s.name()).collect();

    let _ = writeln!(out, "=== Exposure ===");
    let _ = writeln!(
        out,
        "Range:            {} to {} ({} dates)",
        report.start_date,
        report.end_date,
        report.frame.len()
    );
    let _ = writeln!(out, "Enabled systems:  {}", enabled.join(", "));
    match report.exposure.latest() {
        Some(p) => {
            let _ = writeln!(
                out,
                "Current exposure: {:.0}% on {} ({} active)",
                p.exposure_pct, p.date, p.active_systems
            );
        }
        None => {
            let _ = writeln!(out, "Current exposure: n/a");
        }
    }
    let _ = writeln!(
        out,
        "Average exposure: {:.1}%",
        report.exposure.average_pct()
    );

    let _ = writeln!(out, "\n=== Signals Fired ===");
    for &system in &report.enabled {
        let _ = writeln!(
            out,
            "  {:<12}{}",
            system.name(),
            report.signals.fired_count(system)
        );
    }

    let recent = report.recent_trades();
    let _ = writeln!(
        out,
        "\n=== Most Recent Trades (synthetic returns, not backtested) ==="
    );
    if recent.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for t in recent {
        let _ = writeln!(
            out,
            "  {}  {:<12}{:<8}{:>10}  {:>+6.2}%",
            t.date,
            t.system.name(),
            t.status,
            fmt_close(t.spx_close),
            t.pseudo_return.pct()
        );
    }

    out
}

pub fn format_systems() -> String {
    let mut out = String::new();
    for system in SignalSystem::ALL {
        let _ = writeln!(out, "{}", system.name());
        let _ = writeln!(out, "  rule:       {}", system.rule());
        let indicators: Vec<String> = system
            .indicators()
            .iter()
            .map(|i| i.to_string())
            .collect();
        let listed = if indicators.is_empty() {
            "-".to_string()
        } else {
            indicators.join(", ")
        };
        let _ = writeln!(out, "  indicators: {}", listed);
    }
    out
}

pub fn run_dry_run(config_path: &Path, overrides: &RunOverrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_run_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    eprintln!("Config validated successfully");

    eprintln!("\nRange: {} to {}", config.start_date, config.end_date);
    eprintln!("Data:  {}", data_dir(&adapter).display());

    eprintln!("\nSystems to evaluate:");
    for system in &config.systems {
        eprintln!("  {}: {}", system.name(), system.rule());
    }

    let mut indicators: Vec<String> = config
        .systems
        .iter()
        .flat_map(|s| s.indicators())
        .map(|i| i.to_string())
        .collect();
    indicators.sort();
    indicators.dedup();

    eprintln!("\nIndicators to compute:");
    for ind in &indicators {
        eprintln!("  {}", ind);
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_exposure_config(&adapter) {
        Ok(config) => {
            let names: Vec<&str> = config.systems.iter().map(|s| s.name()).collect();
            eprintln!("  range:   {} to {}", config.start_date, config.end_date);
            eprintln!("  systems: {}", names.join(", "));
            eprintln!("  top:     {}", config.top_trades);
            eprintln!("  seed:    {}", config.pseudo_return_seed);
            eprintln!("\nConfiguration is valid");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_info(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data_port = CsvAdapter::new(data_dir(&adapter));
    match format_info(&data_port) {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// One line per instrument with its date range and row count.
pub fn format_info(data_port: &dyn DataPort) -> Result<String, ExposureError> {
    let mut out = String::new();
    for instrument in Instrument::ALL {
        match data_port.get_data_range(instrument)? {
            Some((first, last, rows)) => {
                let _ = writeln!(
                    out,
                    "{:<8}{} to {} ({} rows)",
                    instrument.code(),
                    first,
                    last,
                    rows
                );
            }
            None => {
                let _ = writeln!(out, "{:<8}no data", instrument.code());
            }
        }
    }
    Ok(out)
}
