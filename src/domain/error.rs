//! Domain error types.
//!
//! Expected edge cases (short series, no signals, no trades) resolve to
//! well-defined values and never appear here. These variants cover genuine
//! failures: bad configuration, unreadable data, internal misalignment.

use chrono::NaiveDate;

/// Top-level error type for trademon.
#[derive(Debug, thiserror::Error)]
pub enum TrademonError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("strategy '{name}' is not implemented")]
    StrategyNotImplemented { name: String },

    #[error("bar dates out of order: {next} does not follow {prev}")]
    OutOfOrderBars { prev: NaiveDate, next: NaiveDate },

    #[error("signal stream length {signals} does not match series length {bars}")]
    SeriesMisaligned { bars: usize, signals: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TrademonError> for std::process::ExitCode {
    fn from(err: &TrademonError) -> Self {
        let code: u8 = match err {
            TrademonError::Io(_) => 1,
            TrademonError::ConfigParse { .. } | TrademonError::ConfigInvalid { .. } => 2,
            TrademonError::Data { .. } | TrademonError::NoData { .. } => 3,
            TrademonError::StrategyNotImplemented { .. } => 4,
            TrademonError::OutOfOrderBars { .. } | TrademonError::SeriesMisaligned { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strategy_not_implemented() {
        let err = TrademonError::StrategyNotImplemented {
            name: "turtle".into(),
        };
        assert_eq!(err.to_string(), "strategy 'turtle' is not implemented");
    }

    #[test]
    fn display_series_misaligned() {
        let err = TrademonError::SeriesMisaligned {
            bars: 10,
            signals: 9,
        };
        assert_eq!(
            err.to_string(),
            "signal stream length 9 does not match series length 10"
        );
    }

    #[test]
    fn display_out_of_order() {
        let err = TrademonError::OutOfOrderBars {
            prev: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            next: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert!(err.to_string().contains("2024-01-01"));
        assert!(err.to_string().contains("2024-01-02"));
    }
}
