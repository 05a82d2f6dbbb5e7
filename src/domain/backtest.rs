//! Strategy dispatch: indicator computation → classification → simulation.
//!
//! Each strategy is a fixed pipeline over the same three stages; dispatch
//! selects which indicators feed which classifier. The dispatcher also backs
//! the watchlist scan, which evaluates the composite classifier at the most
//! recent bar only.

use crate::domain::error::TrademonError;
use crate::domain::indicator::{
    calculate_bollinger, calculate_macd, calculate_rolling_return, calculate_rsi, calculate_sma,
    IndicatorSeries,
};
use crate::domain::ohlcv::{validate_series, PriceBar};
use crate::domain::params::StrategyParams;
use crate::domain::signal::{
    bollinger_signals, composite_signals, ma_cross_signals, macd_cross_signals,
    macd_level_signals, macd_rsi_signals, momentum_return_signals, rsi_signals, Signal,
};
use crate::domain::simulator::{simulate, total_return, Trade};
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    MaCross,
    Macd,
    Rsi,
    MacdRsi,
    Bollinger,
    MomentumSignal,
    MomentumReturnMa,
}

impl Strategy {
    pub const ALL: [Strategy; 7] = [
        Strategy::MaCross,
        Strategy::Macd,
        Strategy::Rsi,
        Strategy::MacdRsi,
        Strategy::Bollinger,
        Strategy::MomentumSignal,
        Strategy::MomentumReturnMa,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::MaCross => "ma_cross",
            Strategy::Macd => "macd",
            Strategy::Rsi => "rsi",
            Strategy::MacdRsi => "macd_rsi",
            Strategy::Bollinger => "bollinger",
            Strategy::MomentumSignal => "momentum_signal",
            Strategy::MomentumReturnMa => "momentum_return_ma",
        }
    }

    /// Resolve a strategy name. Unknown names are reported as
    /// not-implemented; no computation happens for them.
    pub fn parse(name: &str) -> Result<Self, TrademonError> {
        Strategy::ALL
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| TrademonError::StrategyNotImplemented { name: name.into() })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one backtest invocation. Owned by the caller; the marker date
/// lists exist for chart rendering.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub strategy: Strategy,
    pub signals: Vec<Signal>,
    pub trades: Vec<Trade>,
    /// `None` when the simulator produced no trades.
    pub total_return: Option<f64>,
    pub buy_dates: Vec<NaiveDate>,
    pub sell_dates: Vec<NaiveDate>,
    /// The indicator series the strategy computed, for charting.
    pub indicators: Vec<IndicatorSeries>,
}

/// Run one strategy over a full price series.
pub fn run_backtest(
    strategy: Strategy,
    bars: &[PriceBar],
    params: &StrategyParams,
) -> Result<BacktestResult, TrademonError> {
    validate_series(bars)?;

    let (signals, indicators) = build_signals(strategy, bars, params);
    let trades = simulate(bars, &signals)?;

    let buy_dates = trades.iter().map(|t| t.entry_date).collect();
    let sell_dates = trades.iter().map(|t| t.exit_date).collect();
    let total_return = total_return(&trades);

    Ok(BacktestResult {
        strategy,
        signals,
        trades,
        total_return,
        buy_dates,
        sell_dates,
        indicators,
    })
}

fn build_signals(
    strategy: Strategy,
    bars: &[PriceBar],
    params: &StrategyParams,
) -> (Vec<Signal>, Vec<IndicatorSeries>) {
    match strategy {
        Strategy::MaCross => {
            let short = calculate_sma(bars, params.ma_cross.short);
            let long = calculate_sma(bars, params.ma_cross.long);
            let signals = ma_cross_signals(&short, &long);
            (signals, vec![short, long])
        }
        Strategy::Macd => {
            let macd = calculate_macd(bars, &params.macd);
            let signals = macd_cross_signals(&macd);
            (signals, vec![macd])
        }
        Strategy::Rsi => {
            let rsi = calculate_rsi(bars, params.rsi.period, params.rsi.zero_loss_policy);
            let signals = rsi_signals(&rsi, &params.rsi);
            (signals, vec![rsi])
        }
        Strategy::MacdRsi => {
            let macd = calculate_macd(bars, &params.macd);
            let rsi = calculate_rsi(bars, params.rsi.period, params.rsi.zero_loss_policy);
            let signals = macd_rsi_signals(&macd, &rsi, &params.rsi);
            (signals, vec![macd, rsi])
        }
        Strategy::Bollinger => {
            let bands = calculate_bollinger(bars, &params.bollinger);
            let signals = bollinger_signals(bars, &bands, params.bollinger.use_rebound);
            (signals, vec![bands])
        }
        Strategy::MomentumSignal => {
            let (families, indicators) = composite_families(bars, params);
            let signals = composite_signals(
                &families.macd,
                &families.ma,
                &families.bb,
                &families.rsi,
            );
            (signals, indicators)
        }
        Strategy::MomentumReturnMa => {
            let ret = calculate_rolling_return(bars, params.momentum_return.return_window);
            let short = calculate_sma(bars, params.ma_cross.short);
            let long = calculate_sma(bars, params.ma_cross.long);
            let signals =
                momentum_return_signals(&ret, &short, &long, params.momentum_return.threshold);
            (signals, vec![ret, short, long])
        }
    }
}

/// The four per-family streams feeding the composite score.
struct FamilySignals {
    macd: Vec<Signal>,
    ma: Vec<Signal>,
    bb: Vec<Signal>,
    rsi: Vec<Signal>,
}

fn composite_families(
    bars: &[PriceBar],
    params: &StrategyParams,
) -> (FamilySignals, Vec<IndicatorSeries>) {
    let macd = calculate_macd(bars, &params.macd);
    let short = calculate_sma(bars, params.ma_cross.short);
    let long = calculate_sma(bars, params.ma_cross.long);
    let bands = calculate_bollinger(bars, &params.bollinger);
    let rsi = calculate_rsi(bars, params.rsi.period, params.rsi.zero_loss_policy);

    let families = FamilySignals {
        macd: macd_level_signals(&macd),
        ma: ma_cross_signals(&short, &long),
        bb: bollinger_signals(bars, &bands, params.bollinger.use_rebound),
        rsi: rsi_signals(&rsi, &params.rsi),
    };

    (families, vec![macd, short, long, bands, rsi])
}

/// Latest-bar scoring for one watchlist entry: the family signals, the
/// composite label, and the values the monitor table displays.
#[derive(Debug, Clone)]
pub struct ScanRow {
    pub code: String,
    pub date: NaiveDate,
    pub close: f64,
    pub macd_signal: Signal,
    pub ma_signal: Signal,
    pub bb_signal: Signal,
    pub rsi_signal: Signal,
    pub composite: Signal,
    pub rsi: Option<f64>,
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
}

/// Evaluate the composite classifier at the most recent bar of a series.
pub fn scan_latest(
    code: &str,
    bars: &[PriceBar],
    params: &StrategyParams,
) -> Result<ScanRow, TrademonError> {
    validate_series(bars)?;

    let Some(last) = bars.last() else {
        return Err(TrademonError::NoData { code: code.into() });
    };
    let i = bars.len() - 1;

    let (families, indicators) = composite_families(bars, params);
    let composite = composite_signals(&families.macd, &families.ma, &families.bb, &families.rsi);

    // composite_families returns [macd, short, long, bands, rsi]
    let short_ma = indicators[1].values[i].simple();
    let long_ma = indicators[2].values[i].simple();
    let rsi = indicators[4].values[i].simple();

    Ok(ScanRow {
        code: code.into(),
        date: last.date,
        close: last.close,
        macd_signal: families.macd[i],
        ma_signal: families.ma[i],
        bb_signal: families.bb[i],
        rsi_signal: families.rsi[i],
        composite: composite[i],
        rsi,
        short_ma,
        long_ma,
    })
}
