//! Single-position trade simulation.
//!
//! Two states: FLAT and LONG. A BUY-class signal opens while flat, a
//! SELL-class signal closes while long, and a position still open at the last
//! bar is force-closed at that bar's close. SELL while flat and BUY while
//! long are ignored: no shorting, no averaging in, no fees or slippage.

use crate::domain::error::TrademonError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::Signal;
use chrono::NaiveDate;

/// Open position state while the simulation is LONG.
#[derive(Debug, Clone)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
}

/// One completed entry/exit cycle.
#[derive(Debug, Clone)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Fractional return: (exit - entry) / entry.
    pub profit: f64,
}

impl Trade {
    fn close(position: Position, exit_bar: &PriceBar) -> Self {
        let profit = (exit_bar.close - position.entry_price) / position.entry_price;
        Trade {
            entry_date: position.entry_date,
            exit_date: exit_bar.date,
            entry_price: position.entry_price,
            exit_price: exit_bar.close,
            profit,
        }
    }
}

/// Run the FLAT/LONG state machine over an aligned (bars, signals) pair.
///
/// A length mismatch is a computation bug upstream and is surfaced rather
/// than truncated.
pub fn simulate(bars: &[PriceBar], signals: &[Signal]) -> Result<Vec<Trade>, TrademonError> {
    if bars.len() != signals.len() {
        return Err(TrademonError::SeriesMisaligned {
            bars: bars.len(),
            signals: signals.len(),
        });
    }

    let (open, mut trades) = bars.iter().zip(signals).fold(
        (None::<Position>, Vec::new()),
        |(open, mut trades), (bar, signal)| match open {
            None if signal.is_buy() => (
                Some(Position {
                    entry_date: bar.date,
                    entry_price: bar.close,
                }),
                trades,
            ),
            Some(position) if signal.is_sell() => {
                trades.push(Trade::close(position, bar));
                (None, trades)
            }
            state => (state, trades),
        },
    );

    // Terminal liquidation: never drop an open position.
    if let (Some(position), Some(last)) = (open, bars.last()) {
        trades.push(Trade::close(position, last));
    }

    Ok(trades)
}

/// Compound the per-trade returns: Π(1 + r) − 1. `None` when no trades
/// occurred, so callers can distinguish "no trades" from a 0% outcome.
pub fn total_return(trades: &[Trade]) -> Option<f64> {
    if trades.is_empty() {
        return None;
    }
    Some(trades.iter().fold(1.0, |acc, t| acc * (1.0 + t.profit)) - 1.0)
}
