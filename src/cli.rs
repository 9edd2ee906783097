//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::PairtraderError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_PATH: &str = ".";
pub const DEFAULT_OUTPUT_DIR: &str = "report";

#[derive(Parser, Debug)]
#[command(name = "pairtrader", about = "Pairs-trading ratio backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol_a: Option<String>,
        #[arg(long)]
        symbol_b: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol_a,
            symbol_b,
            output,
        } => run_backtest(
            &config,
            symbol_a.as_deref(),
            symbol_b.as_deref(),
            output.as_ref(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn fail(err: PairtraderError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

fn run_backtest(
    config_path: &Path,
    symbol_a: Option<&str>,
    symbol_b: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate config sections into a BacktestConfig, apply command line overrides
    let mut bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    apply_symbol_overrides(&mut bt_config, symbol_a, symbol_b);

    // Stage 3: Resolve data and output locations
    let data_port = CsvAdapter::new(data_path(&adapter));
    let output_dir = output_path
        .cloned()
        .unwrap_or_else(|| output_dir(&adapter));

    eprintln!(
        "Running backtest: {} / {}, {} to {}",
        bt_config.symbol_a, bt_config.symbol_b, bt_config.start_date, bt_config.end_date,
    );

    // Stages 4-6: fetch, run, report
    let result = match run_backtest_pipeline(
        &data_port,
        &CsvReportAdapter::new(),
        &bt_config,
        &output_dir,
    ) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    print_summary(&result);
    eprintln!("\nReport written to: {}", output_dir.display());
    ExitCode::SUCCESS
}

/// Fetch both legs, run the backtest, and write the report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    bt_config: &BacktestConfig,
    output_dir: &Path,
) -> Result<BacktestResult, PairtraderError> {
    bt_config.validate()?;

    let series_a =
        data_port.fetch_prices(&bt_config.symbol_a, bt_config.start_date, bt_config.end_date)?;
    let series_b =
        data_port.fetch_prices(&bt_config.symbol_b, bt_config.start_date, bt_config.end_date)?;
    eprintln!(
        "  Loaded {} prices for {}, {} for {}",
        series_a.len(),
        bt_config.symbol_a,
        series_b.len(),
        bt_config.symbol_b,
    );

    let result = backtest_engine::run_backtest(&series_a, &series_b, bt_config)?;
    eprintln!("  Processing: {} aligned dates", result.rows.len());

    report_port.write(&result, bt_config, output_dir)?;
    Ok(result)
}

/// Validate the `[backtest]` and `[strategy]` sections and assemble the
/// typed config from the parsed values.
pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, PairtraderError> {
    let pair = validate_backtest_config(adapter)?;
    let strategy = validate_strategy_config(adapter)?;

    Ok(BacktestConfig {
        symbol_a: pair.symbol_a,
        symbol_b: pair.symbol_b,
        start_date: pair.start_date,
        end_date: pair.end_date,
        lookback: strategy.lookback,
        rsi_period: strategy.rsi_period,
        rsi_source: strategy.rsi_source,
        entry_deviation: strategy.entry_deviation,
        exit_deviation: strategy.exit_deviation,
    })
}

pub fn apply_symbol_overrides(
    bt_config: &mut BacktestConfig,
    symbol_a: Option<&str>,
    symbol_b: Option<&str>,
) {
    if let Some(a) = symbol_a {
        bt_config.symbol_a = a.trim().to_string();
    }
    if let Some(b) = symbol_b {
        bt_config.symbol_b = b.trim().to_string();
    }
}

pub fn data_path(adapter: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(
        adapter
            .get_string("data", "path")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
    )
}

pub fn output_dir(adapter: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(
        adapter
            .get_string("report", "output_dir")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
    )
}

fn print_summary(result: &BacktestResult) {
    eprintln!("\n=== Summary ===");
    for (label, value) in result.metrics().to_table() {
        eprintln!("{:<32}{}", format!("{label}:"), value);
    }

    if !result.ledger.is_empty() {
        eprintln!("\n=== Trades ===");
        for trade in &result.ledger {
            let sign = if trade.profit_pct >= 0.0 { "+" } else { "" };
            eprintln!(
                "  {} {} -> {}: {}{:.2}% ({} days, worst {:.2}%)",
                trade.trade_type,
                trade.entry_date,
                trade.exit_date,
                sign,
                trade.profit_pct,
                trade.holding_period_days,
                trade.max_drawdown_pct,
            );
        }
    }

    let final_position = result.final_position();
    if !final_position.is_flat() {
        eprintln!("\nPosition still open at end of window: {final_position}");
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    if let Err(e) = bt_config.validate() {
        return fail(e);
    }

    eprintln!("\nPair:");
    eprintln!("  symbol_a:        {}", bt_config.symbol_a);
    eprintln!("  symbol_b:        {}", bt_config.symbol_b);
    eprintln!("  window:          {} to {}", bt_config.start_date, bt_config.end_date);
    eprintln!("\nStrategy:");
    eprintln!("  lookback:        {}", bt_config.lookback);
    eprintln!("  rsi_period:      {}", bt_config.rsi_period);
    eprintln!("  rsi_source:      {}", bt_config.rsi_source);
    eprintln!("  entry_deviation: {}", bt_config.entry_deviation);
    eprintln!("  exit_deviation:  {}", bt_config.exit_deviation);
    eprintln!("\nData:   {}", data_path(&adapter).display());
    eprintln!("Report: {}", output_dir(&adapter).display());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let dir = data_path(&adapter);
    let symbols = match CsvAdapter::new(dir.clone()).list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
