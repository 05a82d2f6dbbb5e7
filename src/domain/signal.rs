//! Per-bar signal classification.
//!
//! Each classifier maps indicator series to one [`Signal`] per bar, aligned
//! with the input series. A bar with any undefined indicator input is HOLD
//! for that family; classifiers never compare against invalid points.
//!
//! Single-indicator families emit only BUY/SELL/HOLD; the weighted composite
//! also emits the STRONG variants.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::ohlcv::PriceBar;
use crate::domain::params::RsiParams;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Signal {
    /// BUY-class: opens a position when flat.
    pub fn is_buy(&self) -> bool {
        matches!(self, Signal::Buy | Signal::StrongBuy)
    }

    /// SELL-class: closes a position when long.
    pub fn is_sell(&self) -> bool {
        matches!(self, Signal::Sell | Signal::StrongSell)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::StrongBuy => "STRONG BUY",
            Signal::Buy => "BUY",
            Signal::Hold => "HOLD",
            Signal::Sell => "SELL",
            Signal::StrongSell => "STRONG SELL",
        };
        write!(f, "{label}")
    }
}

fn macd_components(point: &IndicatorPoint) -> Option<(f64, f64)> {
    match point.value {
        IndicatorValue::Macd { line, signal, .. } if point.valid => Some((line, signal)),
        _ => None,
    }
}

fn band_components(point: &IndicatorPoint) -> Option<(f64, f64)> {
    match point.value {
        IndicatorValue::Bollinger { upper, lower, .. } if point.valid => Some((upper, lower)),
        _ => None,
    }
}

/// MA cross family: short MA above long MA is BUY, below is SELL.
pub fn ma_cross_signals(short_ma: &IndicatorSeries, long_ma: &IndicatorSeries) -> Vec<Signal> {
    short_ma
        .values
        .iter()
        .zip(&long_ma.values)
        .map(|(s, l)| match (s.simple(), l.simple()) {
            (Some(short), Some(long)) if short > long => Signal::Buy,
            (Some(short), Some(long)) if short < long => Signal::Sell,
            _ => Signal::Hold,
        })
        .collect()
}

/// MACD crossover family: the line crossing its signal line between the
/// previous bar and this one fires BUY (upward) or SELL (downward).
pub fn macd_cross_signals(macd: &IndicatorSeries) -> Vec<Signal> {
    let mut out = Vec::with_capacity(macd.values.len());

    for (i, point) in macd.values.iter().enumerate() {
        let signal = if i == 0 {
            Signal::Hold
        } else {
            match (macd_components(&macd.values[i - 1]), macd_components(point)) {
                (Some((prev_line, prev_sig)), Some((line, sig))) => {
                    if prev_line < prev_sig && line > sig {
                        Signal::Buy
                    } else if prev_line > prev_sig && line < sig {
                        Signal::Sell
                    } else {
                        Signal::Hold
                    }
                }
                _ => Signal::Hold,
            }
        };
        out.push(signal);
    }

    out
}

/// MACD level comparison, used by the composite score: line above its signal
/// line is BUY, below is SELL.
pub fn macd_level_signals(macd: &IndicatorSeries) -> Vec<Signal> {
    macd.values
        .iter()
        .map(|point| match macd_components(point) {
            Some((line, sig)) if line > sig => Signal::Buy,
            Some((line, sig)) if line < sig => Signal::Sell,
            _ => Signal::Hold,
        })
        .collect()
}

/// RSI family: oversold is BUY, overbought is SELL.
pub fn rsi_signals(rsi: &IndicatorSeries, params: &RsiParams) -> Vec<Signal> {
    rsi.values
        .iter()
        .map(|point| match point.simple() {
            Some(value) if value < params.lower => Signal::Buy,
            Some(value) if value > params.upper => Signal::Sell,
            _ => Signal::Hold,
        })
        .collect()
}

/// Bollinger family.
///
/// Touch mode: close below the lower band is BUY, above the upper band SELL.
/// Rebound mode: a band touch additionally needs a one-bar price reversal;
/// the signal is attributed to the confirmation bar (t+1), so the output is
/// still bar-aligned and the final bar can only carry a confirmed signal.
pub fn bollinger_signals(
    bars: &[PriceBar],
    bands: &IndicatorSeries,
    use_rebound: bool,
) -> Vec<Signal> {
    let mut out = vec![Signal::Hold; bars.len()];

    if use_rebound {
        for i in 0..bars.len().saturating_sub(1) {
            if let Some((upper, lower)) = band_components(&bands.values[i]) {
                if bars[i].close < lower && bars[i + 1].close > bars[i].close {
                    out[i + 1] = Signal::Buy;
                } else if bars[i].close > upper && bars[i + 1].close < bars[i].close {
                    out[i + 1] = Signal::Sell;
                }
            }
        }
    } else {
        for (i, bar) in bars.iter().enumerate() {
            if let Some((upper, lower)) = band_components(&bands.values[i]) {
                if bar.close < lower {
                    out[i] = Signal::Buy;
                } else if bar.close > upper {
                    out[i] = Signal::Sell;
                }
            }
        }
    }

    out
}

/// Momentum-return family: BUY when the rolling return clears the threshold
/// while the short MA is above the long MA; SELL when the trend inverts or
/// the rolling return goes negative.
pub fn momentum_return_signals(
    rolling_return: &IndicatorSeries,
    short_ma: &IndicatorSeries,
    long_ma: &IndicatorSeries,
    threshold: f64,
) -> Vec<Signal> {
    let len = rolling_return.values.len();
    let mut out = Vec::with_capacity(len);

    for i in 0..len {
        let ret = rolling_return.values[i].simple();
        let short = short_ma.values[i].simple();
        let long = long_ma.values[i].simple();

        let signal = match (ret, short, long) {
            (Some(ret), Some(short), Some(long)) => {
                if ret >= threshold && short > long {
                    Signal::Buy
                } else if short < long || ret < 0.0 {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
            _ => Signal::Hold,
        };
        out.push(signal);
    }

    out
}

/// MACD + RSI family: a MACD golden cross confirmed by an oversold RSI fires
/// BUY; the line dropping below its signal line or an overbought RSI fires
/// SELL.
pub fn macd_rsi_signals(
    macd: &IndicatorSeries,
    rsi: &IndicatorSeries,
    params: &RsiParams,
) -> Vec<Signal> {
    let len = macd.values.len();
    let mut out = Vec::with_capacity(len);

    for i in 0..len {
        if i == 0 {
            out.push(Signal::Hold);
            continue;
        }

        let prev = macd_components(&macd.values[i - 1]);
        let curr = macd_components(&macd.values[i]);
        let rsi_val = rsi.values[i].simple();

        let signal = match (prev, curr, rsi_val) {
            (Some((prev_line, prev_sig)), Some((line, sig)), Some(rsi_val)) => {
                if prev_line < prev_sig && line > sig && rsi_val < params.lower {
                    Signal::Buy
                } else if line < sig || rsi_val > params.upper {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
            _ => Signal::Hold,
        };
        out.push(signal);
    }

    out
}

/// Weighted score of the four sub-signals: MACD counts double, the rest
/// single. Fixed policy, not configurable.
pub fn composite_score(macd: Signal, ma: Signal, bb: Signal, rsi: Signal) -> i32 {
    let mut score = 0;
    for (signal, weight) in [(macd, 2), (ma, 1), (bb, 1), (rsi, 1)] {
        if signal.is_buy() {
            score += weight;
        } else if signal.is_sell() {
            score -= weight;
        }
    }
    score
}

/// Map a composite score to the five-level label.
pub fn score_label(score: i32) -> Signal {
    if score >= 4 {
        Signal::StrongBuy
    } else if score >= 2 {
        Signal::Buy
    } else if score <= -4 {
        Signal::StrongSell
    } else if score <= -2 {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Composite classifier over pre-computed per-family signal streams.
/// All four streams must be aligned to the same bar index.
pub fn composite_signals(
    macd: &[Signal],
    ma: &[Signal],
    bb: &[Signal],
    rsi: &[Signal],
) -> Vec<Signal> {
    (0..macd.len())
        .map(|i| score_label(composite_score(macd[i], ma[i], bb[i], rsi[i])))
        .collect()
}
