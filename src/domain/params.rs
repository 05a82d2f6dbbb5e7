//! Per-family indicator parameter records.
//!
//! Each backtest or scan invocation receives its own copy; nothing here is
//! shared mutably across invocations. Defaults mirror the shipped monitor
//! configuration (RSI 14/30/70, MA 5/20, MACD 12/26/9, Bollinger 20/2.0,
//! momentum-return 5/2%).

use crate::domain::error::TrademonError;
use crate::ports::config_port::ConfigPort;

/// How RSI resolves a zero average loss. The ratio gain/loss has no finite
/// value there, so the resolution is an explicit policy rather than an
/// accident of float division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroLossPolicy {
    /// Gains with zero losses read as maximum strength: RSI = 100.
    /// A window with zero gains *and* zero losses stays undefined.
    Saturate,
    /// Zero losses read as neutral: RSI = 50, defined even for flat windows.
    Neutral,
}

#[derive(Debug, Clone)]
pub struct RsiParams {
    pub period: usize,
    pub lower: f64,
    pub upper: f64,
    pub zero_loss_policy: ZeroLossPolicy,
}

impl Default for RsiParams {
    fn default() -> Self {
        RsiParams {
            period: 14,
            lower: 30.0,
            upper: 70.0,
            zero_loss_policy: ZeroLossPolicy::Saturate,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaCrossParams {
    pub short: usize,
    pub long: usize,
}

impl Default for MaCrossParams {
    fn default() -> Self {
        MaCrossParams { short: 5, long: 20 }
    }
}

#[derive(Debug, Clone)]
pub struct MacdParams {
    pub short: usize,
    pub long: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        MacdParams {
            short: 12,
            long: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BollingerParams {
    pub period: usize,
    pub std_dev_multiplier: f64,
    /// Require a one-bar price reversal after a band touch before signalling.
    pub use_rebound: bool,
}

impl Default for BollingerParams {
    fn default() -> Self {
        BollingerParams {
            period: 20,
            std_dev_multiplier: 2.0,
            use_rebound: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MomentumReturnParams {
    pub return_window: usize,
    pub threshold: f64,
}

impl Default for MomentumReturnParams {
    fn default() -> Self {
        MomentumReturnParams {
            return_window: 5,
            threshold: 0.02,
        }
    }
}

/// Full parameter snapshot for one strategy run.
#[derive(Debug, Clone, Default)]
pub struct StrategyParams {
    pub rsi: RsiParams,
    pub ma_cross: MaCrossParams,
    pub macd: MacdParams,
    pub bollinger: BollingerParams,
    pub momentum_return: MomentumReturnParams,
}

impl StrategyParams {
    /// Build a parameter snapshot from an INI-style config, falling back to
    /// the defaults for missing keys and rejecting values that cannot yield
    /// a meaningful computation.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TrademonError> {
        let defaults = StrategyParams::default();

        let rsi = RsiParams {
            period: read_period(config, "rsi", "period", defaults.rsi.period)?,
            lower: config.get_double("rsi", "lower", defaults.rsi.lower),
            upper: config.get_double("rsi", "upper", defaults.rsi.upper),
            zero_loss_policy: read_zero_loss_policy(config)?,
        };
        if rsi.lower >= rsi.upper {
            return Err(TrademonError::ConfigInvalid {
                section: "rsi".into(),
                key: "lower".into(),
                reason: format!("lower ({}) must be below upper ({})", rsi.lower, rsi.upper),
            });
        }

        let ma_cross = MaCrossParams {
            short: read_period(config, "ma_cross", "short", defaults.ma_cross.short)?,
            long: read_period(config, "ma_cross", "long", defaults.ma_cross.long)?,
        };
        if ma_cross.short >= ma_cross.long {
            return Err(TrademonError::ConfigInvalid {
                section: "ma_cross".into(),
                key: "short".into(),
                reason: format!(
                    "short window ({}) must be below long window ({})",
                    ma_cross.short, ma_cross.long
                ),
            });
        }

        let macd = MacdParams {
            short: read_period(config, "macd", "short", defaults.macd.short)?,
            long: read_period(config, "macd", "long", defaults.macd.long)?,
            signal: read_period(config, "macd", "signal", defaults.macd.signal)?,
        };
        if macd.short >= macd.long {
            return Err(TrademonError::ConfigInvalid {
                section: "macd".into(),
                key: "short".into(),
                reason: format!(
                    "short span ({}) must be below long span ({})",
                    macd.short, macd.long
                ),
            });
        }

        let bollinger = BollingerParams {
            period: read_period(config, "bollinger", "period", defaults.bollinger.period)?,
            std_dev_multiplier: config.get_double(
                "bollinger",
                "std_dev_multiplier",
                defaults.bollinger.std_dev_multiplier,
            ),
            use_rebound: config.get_bool("bollinger", "use_rebound", defaults.bollinger.use_rebound),
        };
        if bollinger.period < 2 {
            return Err(TrademonError::ConfigInvalid {
                section: "bollinger".into(),
                key: "period".into(),
                reason: "period must be at least 2 for a standard deviation".into(),
            });
        }
        if bollinger.std_dev_multiplier < 0.0 {
            return Err(TrademonError::ConfigInvalid {
                section: "bollinger".into(),
                key: "std_dev_multiplier".into(),
                reason: "multiplier must not be negative".into(),
            });
        }

        let momentum_return = MomentumReturnParams {
            return_window: read_period(
                config,
                "momentum_return",
                "return_window",
                defaults.momentum_return.return_window,
            )?,
            threshold: config.get_double(
                "momentum_return",
                "threshold",
                defaults.momentum_return.threshold,
            ),
        };

        Ok(StrategyParams {
            rsi,
            ma_cross,
            macd,
            bollinger,
            momentum_return,
        })
    }
}

fn read_period(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, TrademonError> {
    let value = config.get_int(section, key, default as i64);
    if value < 1 {
        return Err(TrademonError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("period must be at least 1, got {value}"),
        });
    }
    Ok(value as usize)
}

fn read_zero_loss_policy(config: &dyn ConfigPort) -> Result<ZeroLossPolicy, TrademonError> {
    match config.get_string("rsi", "zero_loss_policy") {
        None => Ok(ZeroLossPolicy::Saturate),
        Some(value) => match value.to_lowercase().as_str() {
            "saturate" => Ok(ZeroLossPolicy::Saturate),
            "neutral" => Ok(ZeroLossPolicy::Neutral),
            _ => Err(TrademonError::ConfigInvalid {
                section: "rsi".into(),
                key: "zero_loss_policy".into(),
                reason: format!("expected 'saturate' or 'neutral', got '{value}'"),
            }),
        },
    }
}
