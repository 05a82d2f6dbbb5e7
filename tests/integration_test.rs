//! End-to-end backtests over the public API: price series in, trades and
//! total return out, including the config-file pipeline.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use trademon::adapters::csv_adapter::CsvAdapter;
use trademon::adapters::file_config_adapter::FileConfigAdapter;
use trademon::domain::backtest::{run_backtest, scan_latest, Strategy};
use trademon::domain::ohlcv::PriceBar;
use trademon::domain::params::StrategyParams;
use trademon::domain::signal::Signal;
use trademon::ports::config_port::ConfigPort;
use trademon::ports::data_port::DataPort;

fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            PriceBar::from_close(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                close,
            )
        })
        .collect()
}

#[test]
fn ma_cross_rising_market_single_round_trip() {
    // 25 bars rising 100..124 with short=5/long=20: the long MA becomes
    // defined at bar 19 with the short MA already above it, so one entry at
    // close 119 and a forced liquidation at the final close 124.
    let bars = make_bars(&(0..25).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
    let result = run_backtest(Strategy::MaCross, &bars, &StrategyParams::default()).unwrap();

    assert_eq!(result.trades.len(), 1);
    let trade = &result.trades[0];
    assert_eq!(trade.entry_date, bars[19].date);
    assert_relative_eq!(trade.entry_price, 119.0);
    assert_eq!(trade.exit_date, bars[24].date);
    assert_relative_eq!(trade.exit_price, 124.0);
    assert_relative_eq!(result.total_return.unwrap(), 5.0 / 119.0, epsilon = 1e-12);
}

#[test]
fn rsi_falling_market_buys_oversold_and_eats_the_loss() {
    // Strictly falling closes pin the RSI at 0 from the second bar, which is
    // below the oversold bound: entry at bar 1, no exit signal, forced
    // liquidation at the last bar for a losing trade.
    let bars = make_bars(&(0..20).map(|i| 200.0 - i as f64).collect::<Vec<_>>());
    let result = run_backtest(Strategy::Rsi, &bars, &StrategyParams::default()).unwrap();

    assert_eq!(result.trades.len(), 1);
    let trade = &result.trades[0];
    assert_eq!(trade.entry_date, bars[1].date);
    assert_relative_eq!(trade.entry_price, 199.0);
    assert_relative_eq!(trade.exit_price, 181.0);
    assert!(result.total_return.unwrap() < 0.0);
}

#[test]
fn bollinger_rebound_enters_on_the_confirmation_bar() {
    let mut params = StrategyParams::default();
    params.bollinger.period = 3;
    params.bollinger.use_rebound = true;

    // Deep dip at bar 4, recovery at bar 5: the entry belongs to bar 5.
    let bars = make_bars(&[100.0, 101.0, 99.0, 100.0, 70.0, 85.0, 86.0, 87.0]);
    let result = run_backtest(Strategy::Bollinger, &bars, &params).unwrap();

    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].entry_date, bars[5].date);
    assert_relative_eq!(result.trades[0].entry_price, 85.0);
}

#[test]
fn composite_rising_market_is_buy_not_strong_buy() {
    // Steady rise: MACD above its signal line (+2), short MA above long
    // (+1), close inside the bands (0), RSI overbought (-1). Score 2 is a
    // plain BUY.
    let bars = make_bars(&(0..30).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
    let result =
        run_backtest(Strategy::MomentumSignal, &bars, &StrategyParams::default()).unwrap();

    assert_eq!(*result.signals.last().unwrap(), Signal::Buy);
    assert_eq!(result.trades.len(), 1);
    assert!(result.total_return.unwrap() > 0.0);
}

#[test]
fn every_strategy_reports_no_trades_on_a_flat_series() {
    let bars = make_bars(&[150.0; 45]);
    for strategy in Strategy::ALL {
        let result = run_backtest(strategy, &bars, &StrategyParams::default()).unwrap();
        assert!(result.trades.is_empty(), "{strategy} traded");
        assert!(result.total_return.is_none(), "{strategy} reported a return");
    }
}

fn write_fixtures(dir: &TempDir) -> std::path::PathBuf {
    let data_dir = dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();

    let mut csv = String::from("date,open,high,low,close,volume\n");
    for i in 0..25 {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64);
        let close = 100.0 + i as f64;
        csv.push_str(&format!(
            "{date},{close},{close},{close},{close},1000\n"
        ));
    }
    fs::write(data_dir.join("SPY.csv"), &csv).unwrap();
    data_dir
}

#[test]
fn config_file_drives_the_full_pipeline() {
    let dir = TempDir::new().unwrap();
    let data_dir = write_fixtures(&dir);

    let config_path = dir.path().join("trademon.ini");
    fs::write(
        &config_path,
        format!(
            "[data]\npath = {}\n\n\
             [watchlist]\ncodes = SPY\n\n\
             [backtest]\nstrategy = ma_cross\n\n\
             [ma_cross]\nshort = 5\nlong = 20\n",
            data_dir.display()
        ),
    )
    .unwrap();

    let config = FileConfigAdapter::from_file(&config_path).unwrap();
    let params = StrategyParams::from_config(&config).unwrap();
    let strategy = Strategy::parse(&config.get_string("backtest", "strategy").unwrap()).unwrap();

    let port = CsvAdapter::new(data_dir);
    let bars = port.fetch_series("SPY", None, None).unwrap();
    let result = run_backtest(strategy, &bars, &params).unwrap();

    assert_eq!(result.trades.len(), 1);
    assert_relative_eq!(result.trades[0].exit_price, 124.0);
}

#[test]
fn date_window_narrows_the_backtest() {
    let dir = TempDir::new().unwrap();
    let data_dir = write_fixtures(&dir);
    let port = CsvAdapter::new(data_dir);

    let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
    let bars = port.fetch_series("SPY", Some(start), Some(end)).unwrap();

    assert_eq!(bars.len(), 11);
    assert_eq!(bars.first().unwrap().date, start);
    assert_eq!(bars.last().unwrap().date, end);

    // Eleven bars is shorter than the 20-bar long MA: nothing trades.
    let result = run_backtest(Strategy::MaCross, &bars, &StrategyParams::default()).unwrap();
    assert!(result.trades.is_empty());
    assert!(result.total_return.is_none());
}

#[test]
fn scan_over_csv_watchlist() {
    let dir = TempDir::new().unwrap();
    let data_dir = write_fixtures(&dir);
    let port = CsvAdapter::new(data_dir);

    let bars = port.fetch_series("SPY", None, None).unwrap();
    let row = scan_latest("SPY", &bars, &StrategyParams::default()).unwrap();

    assert_eq!(row.code, "SPY");
    assert_relative_eq!(row.close, 124.0);
    assert_eq!(row.ma_signal, Signal::Buy);
    assert_eq!(row.composite, Signal::Buy);
}

#[test]
fn config_rejects_inverted_rsi_bounds() {
    let config =
        FileConfigAdapter::from_string("[rsi]\nlower = 80\nupper = 20\n").unwrap();
    assert!(StrategyParams::from_config(&config).is_err());
}
