//! Data access port trait.
//!
//! The core never fetches anything itself; a data adapter hands it a
//! complete, date-bounded series and the core validates before computing.

use crate::domain::error::TrademonError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_series(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, TrademonError>;

    fn list_codes(&self) -> Result<Vec<String>, TrademonError>;
}
