//! Rolling return over a lookback window.
//!
//! return(n)[t] = close[t] / close[t-n] - 1
//! Warmup: first n bars are invalid. A zero reference close stays invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_rolling_return(bars: &[PriceBar], window: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let date = bars[i].date;
        if window == 0 || i < window {
            values.push(IndicatorPoint::invalid(date));
            continue;
        }

        let reference = bars[i - window].close;
        if reference == 0.0 {
            values.push(IndicatorPoint::invalid(date));
            continue;
        }

        values.push(IndicatorPoint {
            date,
            valid: true,
            value: IndicatorValue::Simple(bars[i].close / reference - 1.0),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Return(window),
        values,
    }
}
