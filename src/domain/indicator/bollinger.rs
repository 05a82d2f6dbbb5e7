//! Bollinger Bands.
//!
//! Middle: rolling mean over `period` closes.
//! Upper/Lower: middle ± multiplier × rolling sample standard deviation
//! (divides by N-1).
//!
//! Warmup: first (period - 1) bars are invalid. A period below 2 cannot
//! produce a sample deviation and yields an all-invalid series.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;
use crate::domain::params::BollingerParams;

pub fn calculate_bollinger(bars: &[PriceBar], params: &BollingerParams) -> IndicatorSeries {
    let period = params.period;
    let mult = params.std_dev_multiplier;
    let indicator_type = IndicatorType::Bollinger {
        period,
        stddev_mult_x100: (mult * 100.0).round() as u32,
    };

    let mut values = Vec::with_capacity(bars.len());

    if period < 2 {
        for bar in bars {
            values.push(IndicatorPoint::invalid(bar.date));
        }
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    for i in 0..bars.len() {
        if i + 1 < period {
            values.push(IndicatorPoint::invalid(bars[i].date));
            continue;
        }

        let window = &bars[i + 1 - period..=i];
        let middle = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|b| {
                let diff = b.close - middle;
                diff * diff
            })
            .sum::<f64>()
            / (period - 1) as f64;
        let stddev = variance.sqrt();

        values.push(IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Bollinger {
                upper: middle + mult * stddev,
                middle,
                lower: middle - mult * stddev,
            },
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
