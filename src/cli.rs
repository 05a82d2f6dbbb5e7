//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, scan_latest, Strategy};
use crate::domain::error::TrademonError;
use crate::domain::params::StrategyParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "trademon", about = "Watchlist signal monitor and strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a strategy over historical data
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Ticker override; defaults to the configured watchlist
        #[arg(long)]
        code: Option<String>,
        /// Strategy override; defaults to [backtest] strategy
        #[arg(short, long)]
        strategy: Option<String>,
    },
    /// Score the latest bar of every watchlist ticker
    Scan {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            code,
            strategy,
        } => run_backtest_cmd(&config, code.as_deref(), strategy.as_deref()),
        Command::Scan { config } => run_scan(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TrademonError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn resolve_codes(code_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(code) = code_override {
        return vec![code.to_string()];
    }
    config
        .get_string("watchlist", "codes")
        .map(|codes| {
            codes
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn resolve_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, TrademonError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|e| TrademonError::ConfigInvalid {
                section: "backtest".into(),
                key: key.into(),
                reason: format!("expected YYYY-MM-DD, got '{value}': {e}"),
            }),
    }
}

fn data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, TrademonError> {
    let path = config
        .get_string("data", "path")
        .ok_or_else(|| TrademonError::ConfigInvalid {
            section: "data".into(),
            key: "path".into(),
            reason: "data path is required".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(path)))
}

fn run_backtest_cmd(
    config_path: &PathBuf,
    code_override: Option<&str>,
    strategy_override: Option<&str>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let setup = || -> Result<(StrategyParams, Strategy, CsvAdapter), TrademonError> {
        let params = StrategyParams::from_config(&adapter)?;
        let strategy_name = match strategy_override {
            Some(name) => name.to_string(),
            None => adapter
                .get_string("backtest", "strategy")
                .unwrap_or_else(|| "momentum_signal".to_string()),
        };
        let strategy = Strategy::parse(&strategy_name)?;
        let port = data_port(&adapter)?;
        Ok((params, strategy, port))
    };

    let (params, strategy, port) = match setup() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (start, end) = match (
        resolve_date(&adapter, "start_date"),
        resolve_date(&adapter, "end_date"),
    ) {
        (Ok(s), Ok(e)) => (s, e),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let codes = resolve_codes(code_override, &adapter);
    if codes.is_empty() {
        eprintln!("error: no codes configured");
        return ExitCode::from(2);
    }

    eprintln!("Running '{strategy}' over {} code(s)", codes.len());

    for code in &codes {
        let bars = match port.fetch_series(code, start, end) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let result = match run_backtest(strategy, &bars, &params) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        println!("== {code} [{strategy}] over {} bars ==", bars.len());
        for trade in &result.trades {
            println!(
                "  {} {:>10.2} -> {} {:>10.2}  {:+.2}%",
                trade.entry_date,
                trade.entry_price,
                trade.exit_date,
                trade.exit_price,
                trade.profit * 100.0
            );
        }
        match result.total_return {
            Some(total) => println!(
                "  {} trade(s), total return {:+.2}%",
                result.trades.len(),
                total * 100.0
            ),
            None => println!("  no trades"),
        }
    }

    ExitCode::SUCCESS
}

fn run_scan(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let setup = || -> Result<(StrategyParams, CsvAdapter), TrademonError> {
        Ok((StrategyParams::from_config(&adapter)?, data_port(&adapter)?))
    };
    let (params, port) = match setup() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let codes = resolve_codes(None, &adapter);
    if codes.is_empty() {
        eprintln!("error: no codes configured");
        return ExitCode::from(2);
    }

    println!(
        "{:<8} {:>10} {:>12} {:>6} {:>6} {:>6} {:>6}  {}",
        "CODE", "CLOSE", "COMPOSITE", "MACD", "MA", "BB", "RSI", "RSI value"
    );
    for code in &codes {
        let bars = match port.fetch_series(code, None, None) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let row = match scan_latest(code, &bars, &params) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let rsi = row
            .rsi
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<8} {:>10.2} {:>12} {:>6} {:>6} {:>6} {:>6}  {}",
            row.code,
            row.close,
            row.composite.to_string(),
            row.macd_signal.to_string(),
            row.ma_signal.to_string(),
            row.bb_signal.to_string(),
            row.rsi_signal.to_string(),
            rsi
        );
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = StrategyParams::from_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if let Some(name) = adapter.get_string("backtest", "strategy") {
        if let Err(e) = Strategy::parse(&name) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    println!("config ok");
    ExitCode::SUCCESS
}
