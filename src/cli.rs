//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReport;
use crate::adapters::text_report::TextReport;
use crate::domain::backtest::{Backtest, BacktestConfig, BacktestResult, DEFAULT_INITIAL_CAPITAL};
use crate::domain::config_validation::{validate_backtest_config, validate_date_range};
use crate::domain::error::BarbtError;
use crate::domain::strategy::{StrategyKind, StrategyParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_PATH: &str = "data";
const DEFAULT_SYMBOL: &str = "AAPL";

#[derive(Parser, Debug)]
#[command(name = "barbt", about = "Single-asset bar-by-bar strategy backtester")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Strategy identifier: mac, momentum or mr
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(long)]
        capital: Option<f64>,
        /// Directory holding <SYMBOL>.csv files
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,
        /// Include the trade log in text output
        #[arg(long)]
        trades: bool,
        /// Include the equity curve in text output
        #[arg(long)]
        equity: bool,
    },
    /// Validate a configuration file without running
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in a data directory
    ListSymbols {
        #[arg(short, long)]
        data: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub strategy: Option<String>,
    pub capital: Option<f64>,
    pub data: Option<PathBuf>,
    pub symbol: Option<String>,
    pub format: Option<ReportFormat>,
    pub trades: bool,
    pub equity: bool,
}

/// Everything needed to load data, run, and report.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub backtest: BacktestConfig,
    pub data_path: PathBuf,
    pub symbol: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub format: ReportFormat,
    pub show_trades: bool,
    pub show_equity: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            strategy,
            capital,
            data,
            symbol,
            format,
            trades,
            equity,
        } => {
            let overrides = Overrides {
                strategy,
                capital,
                data,
                symbol,
                format,
                trades,
                equity,
            };
            run_backtest(config.as_ref(), &overrides)
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data } => run_list_symbols(data),
    }
}

fn report_error(err: &BarbtError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, BarbtError> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            FileConfigAdapter::from_file(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn parse_optional_date(
    adapter: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, BarbtError> {
    match adapter
        .get_string("backtest", key)
        .filter(|s| !s.trim().is_empty())
    {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| BarbtError::ConfigInvalid {
                section: "backtest".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }),
    }
}

/// Read `[section] key` and parse it, failing when the key is present but
/// malformed. A missing or blank key yields `default`.
fn parse_setting<T: FromStr>(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, BarbtError> {
    match adapter
        .get_string(section, key)
        .filter(|s| !s.trim().is_empty())
    {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| BarbtError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("cannot parse '{}'", raw.trim()),
        }),
    }
}

fn get_window(adapter: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, BarbtError> {
    parse_setting::<i64>(adapter, "strategy", key, default as i64).and_then(|value| {
        usize::try_from(value).map_err(|_| BarbtError::ConfigInvalid {
            section: "strategy".into(),
            key: key.into(),
            reason: format!("{key} must be a non-negative integer"),
        })
    })
}

pub fn build_strategy_params(adapter: &dyn ConfigPort) -> Result<StrategyParams, BarbtError> {
    let defaults = StrategyParams::default();
    Ok(StrategyParams {
        short_window: get_window(adapter, "short_window", defaults.short_window)?,
        long_window: get_window(adapter, "long_window", defaults.long_window)?,
        lookback: get_window(adapter, "lookback", defaults.lookback)?,
        window: get_window(adapter, "window", defaults.window)?,
        band: parse_setting(adapter, "strategy", "band", defaults.band)?,
    })
}

/// Merge the config file with command line overrides and validate.
pub fn build_run_settings(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<RunSettings, BarbtError> {
    let strategy_id = overrides
        .strategy
        .clone()
        .or_else(|| adapter.get_string("strategy", "name"))
        .unwrap_or_else(|| StrategyKind::MovingAverageCross.to_string());
    let strategy: StrategyKind = strategy_id.parse()?;

    let initial_capital = match overrides.capital {
        Some(capital) => capital,
        None => parse_setting(
            adapter,
            "backtest",
            "initial_capital",
            DEFAULT_INITIAL_CAPITAL,
        )?,
    };

    let backtest = BacktestConfig {
        initial_capital,
        strategy,
        params: build_strategy_params(adapter)?,
    };
    validate_backtest_config(&backtest)?;

    let start_date = parse_optional_date(adapter, "start_date")?;
    let end_date = parse_optional_date(adapter, "end_date")?;
    validate_date_range(start_date, end_date)?;

    let data_path = overrides.data.clone().unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("backtest", "data_path")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
        )
    });

    let symbol = overrides
        .symbol
        .clone()
        .or_else(|| adapter.get_string("backtest", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());

    let format = match overrides.format {
        Some(f) => f,
        None => match adapter.get_string("report", "format") {
            Some(f) => <ReportFormat as ValueEnum>::from_str(f.trim(), true).map_err(|_| {
                BarbtError::ConfigInvalid {
                    section: "report".into(),
                    key: "format".into(),
                    reason: format!("unknown format '{f}' (expected text or json)"),
                }
            })?,
            None => ReportFormat::Text,
        },
    };

    Ok(RunSettings {
        backtest,
        data_path,
        symbol,
        start_date,
        end_date,
        format,
        show_trades: overrides.trades || adapter.get_bool("report", "trades", false),
        show_equity: overrides.equity || adapter.get_bool("report", "equity", false),
    })
}

pub fn report_for(settings: &RunSettings) -> Box<dyn ReportPort> {
    match settings.format {
        ReportFormat::Text => Box::new(TextReport {
            show_trades: settings.show_trades,
            show_equity: settings.show_equity,
        }),
        ReportFormat::Json => Box::new(JsonReport { pretty: true }),
    }
}

/// Load bars through `data_port`, simulate, and write the report to `out`.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    settings: &RunSettings,
    out: &mut dyn Write,
) -> Result<BacktestResult, BarbtError> {
    let bars = data_port.fetch_bars(&settings.symbol, settings.start_date, settings.end_date)?;

    eprintln!(
        "Running backtest: {} ({}) on {} bars, capital {:.2}",
        settings.backtest.strategy,
        settings.symbol,
        bars.len(),
        settings.backtest.initial_capital,
    );

    let result = Backtest::from_config(bars, &settings.backtest).run()?;
    report_for(settings).write(&result, out)?;
    Ok(result)
}

fn run_backtest(config_path: Option<&PathBuf>, overrides: &Overrides) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return report_error(&e),
    };

    let settings = match build_run_settings(&adapter, overrides) {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };

    let data_port = CsvAdapter::new(settings.data_path.clone());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run_backtest_pipeline(&data_port, &settings, &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(Some(config_path)) {
        Ok(a) => a,
        Err(e) => return report_error(&e),
    };

    match build_run_settings(&adapter, &Overrides::default()) {
        Ok(settings) => {
            eprintln!("  strategy: {}", settings.backtest.strategy);
            eprintln!("  capital:  {:.2}", settings.backtest.initial_capital);
            eprintln!(
                "  data:     {}",
                settings.data_path.join(format!("{}.csv", settings.symbol)).display()
            );
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

/// Write one symbol per line to `out`. Returns how many were found.
pub fn run_list_symbols_pipeline(
    data_port: &dyn DataPort,
    out: &mut dyn Write,
) -> Result<usize, BarbtError> {
    let symbols = data_port.list_symbols()?;
    for symbol in &symbols {
        writeln!(out, "{symbol}")?;
    }
    Ok(symbols.len())
}

fn run_list_symbols(data_path: PathBuf) -> ExitCode {
    let adapter = CsvAdapter::new(data_path.clone());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run_list_symbols_pipeline(&adapter, &mut out) {
        Ok(0) => {
            eprintln!("No symbols found in {}", data_path.display());
            ExitCode::SUCCESS
        }
        Ok(count) => {
            eprintln!("{count} symbols found");
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}
