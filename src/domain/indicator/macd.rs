//! MACD (Moving Average Convergence Divergence).
//!
//! MACD line = EMA(short) - EMA(long)
//! Signal line = EMA(macd line, signal span)
//! Histogram = MACD line - signal line
//!
//! Built from the seeded recursive EMA, so every bar has a value.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;
use crate::domain::params::MacdParams;

pub fn calculate_macd(bars: &[PriceBar], params: &MacdParams) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        short: params.short,
        long: params.long,
        signal: params.signal,
    };

    if params.short == 0 || params.long == 0 || params.signal == 0 {
        let values = bars.iter().map(|b| IndicatorPoint::invalid(b.date)).collect();
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_short = ema_values(&closes, params.short);
    let ema_long = ema_values(&closes, params.long);

    let macd_line: Vec<f64> = ema_short
        .iter()
        .zip(&ema_long)
        .map(|(s, l)| s - l)
        .collect();
    let signal_line = ema_values(&macd_line, params.signal);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
