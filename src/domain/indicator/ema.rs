//! Exponential moving average.
//!
//! Non-adjusted recursive form with alpha = 2/(span+1), seeded with the first
//! close: ema[0] = close[0], ema[t] = alpha*close[t] + (1-alpha)*ema[t-1].
//! Every bar has a value; there is no warmup.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], span: usize) -> IndicatorSeries {
    if span == 0 {
        let values = bars.iter().map(|b| IndicatorPoint::invalid(b.date)).collect();
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(span),
            values,
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let smoothed = ema_values(&closes, span);

    let values = bars
        .iter()
        .zip(smoothed)
        .map(|(bar, ema)| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(ema),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

/// Recursive EMA over raw values, also used for the MACD signal line.
/// Caller guarantees `span >= 1`.
pub(crate) fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = 0.0;

    for (i, &value) in values.iter().enumerate() {
        ema = if i == 0 {
            value
        } else {
            alpha * value + (1.0 - alpha) * ema
        };
        out.push(ema);
    }

    out
}
