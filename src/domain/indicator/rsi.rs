//! RSI (Relative Strength Index).
//!
//! Bar-over-bar gains and losses are averaged with a rolling mean over
//! `period` differences, with a minimum of one difference: partial windows at
//! the start of the series produce a value instead of a warmup gap. Only the
//! first bar (which has no difference) is invalid.
//!
//! RSI = 100 - 100/(1 + avg_gain/avg_loss). A zero average loss makes the
//! ratio undefined; resolution is the caller's [`ZeroLossPolicy`]:
//! - `Saturate`: gains with no losses read as RSI 100; a fully flat window
//!   (no gains either) stays undefined.
//! - `Neutral`: any zero-loss window reads as RSI 50.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;
use crate::domain::params::ZeroLossPolicy;

pub fn calculate_rsi(bars: &[PriceBar], period: usize, policy: ZeroLossPolicy) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    if period == 0 || bars.is_empty() {
        for bar in bars {
            values.push(IndicatorPoint::invalid(bar.date));
        }
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values,
        };
    }

    let mut gains = Vec::with_capacity(bars.len().saturating_sub(1));
    let mut losses = Vec::with_capacity(bars.len().saturating_sub(1));
    for pair in bars.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    values.push(IndicatorPoint::invalid(bars[0].date));

    for (i, bar) in bars.iter().enumerate().skip(1) {
        // Rolling mean over the last `period` differences, partial at the start.
        let end = i; // diffs [0, end) are available for bar i
        let start = end.saturating_sub(period);
        let count = (end - start) as f64;
        let avg_gain = gains[start..end].iter().sum::<f64>() / count;
        let avg_loss = losses[start..end].iter().sum::<f64>() / count;

        let rsi = if avg_loss > 0.0 {
            Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
        } else {
            match policy {
                ZeroLossPolicy::Neutral => Some(50.0),
                ZeroLossPolicy::Saturate if avg_gain > 0.0 => Some(100.0),
                ZeroLossPolicy::Saturate => None,
            }
        };

        values.push(match rsi {
            Some(v) => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple(v),
            },
            None => IndicatorPoint::invalid(bar.date),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PriceBar::from_close(
                    NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                    close,
                )
            })
            .collect()
    }

    #[test]
    fn rsi_first_bar_invalid() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let series = calculate_rsi(&bars, 14, ZeroLossPolicy::Saturate);
        assert!(!series.values[0].valid);
        assert!(series.values[1].valid);
    }

    #[test]
    fn rsi_partial_window_produces_values() {
        // period 14 but only 3 diffs available: min-periods-1 semantics.
        let bars = make_bars(&[100.0, 99.0, 101.0, 100.0]);
        let series = calculate_rsi(&bars, 14, ZeroLossPolicy::Saturate);
        for point in series.values.iter().skip(1) {
            assert!(point.valid);
        }
    }

    #[test]
    fn rsi_all_gains_saturates_to_100() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0]);
        let series = calculate_rsi(&bars, 3, ZeroLossPolicy::Saturate);
        assert_relative_eq!(series.values[3].simple().unwrap(), 100.0);
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let bars = make_bars(&[103.0, 102.0, 101.0, 100.0]);
        let series = calculate_rsi(&bars, 3, ZeroLossPolicy::Saturate);
        assert_relative_eq!(series.values[3].simple().unwrap(), 0.0);
    }

    #[test]
    fn rsi_flat_series_saturate_is_undefined() {
        let bars = make_bars(&[100.0, 100.0, 100.0]);
        let series = calculate_rsi(&bars, 3, ZeroLossPolicy::Saturate);
        assert!(!series.values[1].valid);
        assert!(!series.values[2].valid);
    }

    #[test]
    fn rsi_flat_series_neutral_is_50() {
        let bars = make_bars(&[100.0, 100.0, 100.0]);
        let series = calculate_rsi(&bars, 3, ZeroLossPolicy::Neutral);
        assert_relative_eq!(series.values[1].simple().unwrap(), 50.0);
        assert_relative_eq!(series.values[2].simple().unwrap(), 50.0);
    }

    #[test]
    fn rsi_all_gains_neutral_is_50() {
        // Neutral treats every zero-loss window the same way, even with gains.
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let series = calculate_rsi(&bars, 3, ZeroLossPolicy::Neutral);
        assert_relative_eq!(series.values[2].simple().unwrap(), 50.0);
    }

    #[test]
    fn rsi_known_balanced_window() {
        // One +1 gain and one -1 loss in the window: rs = 1, RSI = 50.
        let bars = make_bars(&[100.0, 101.0, 100.0]);
        let series = calculate_rsi(&bars, 2, ZeroLossPolicy::Saturate);
        assert_relative_eq!(series.values[2].simple().unwrap(), 50.0);
    }

    #[test]
    fn rsi_in_range_where_defined() {
        let bars = make_bars(&[
            44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.75, 45.25, 45.5, 45.25, 45.5, 46.0,
        ]);
        let series = calculate_rsi(&bars, 5, ZeroLossPolicy::Saturate);
        for point in &series.values {
            if let Some(rsi) = point.simple() {
                assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
            }
        }
    }

    #[test]
    fn rsi_window_slides() {
        // After the window passes the early losses, only gains remain.
        let bars = make_bars(&[100.0, 99.0, 100.0, 101.0, 102.0, 103.0]);
        let series = calculate_rsi(&bars, 2, ZeroLossPolicy::Saturate);
        assert_relative_eq!(series.values[5].simple().unwrap(), 100.0);
    }

    #[test]
    fn rsi_zero_period_all_invalid() {
        let bars = make_bars(&[100.0, 101.0]);
        let series = calculate_rsi(&bars, 0, ZeroLossPolicy::Saturate);
        assert!(series.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn rsi_empty_bars() {
        let series = calculate_rsi(&[], 14, ZeroLossPolicy::Saturate);
        assert!(series.values.is_empty());
    }
}
