//! Price bar representation and series validation.

use crate::domain::error::TrademonError;
use chrono::NaiveDate;

/// One bar of a price series. The core computes on `date` and `close`;
/// open/high/low/volume are carried through for the caller's charting.
#[derive(Debug, Clone)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// Bar with only a meaningful close, for callers that track quotes
    /// without full OHLCV detail.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        PriceBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }
}

/// Check that bar dates are strictly increasing.
///
/// The core only computes over a validated series; out-of-order input is a
/// caller bug and is surfaced, never coerced.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), TrademonError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(TrademonError::OutOfOrderBars {
                prev: pair[0].date,
                next: pair[1].date,
            });
        }
    }
    Ok(())
}
