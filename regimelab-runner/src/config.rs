//! TOML configuration — every engine knob with its documented default.
//!
//! All sections and fields are optional; an empty file (or no file at all)
//! yields the stock configuration.

use serde::Deserialize;
use std::path::Path;

use regimelab_core::engine::EngineConfig;
use regimelab_core::risk::RiskConfig;
use regimelab_core::strategy::{MeanReversionParams, MomentumParams, RegimeParams};

/// Top-level backtest configuration from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct BacktestConfig {
    #[serde(default)]
    pub backtest: BacktestSection,
    #[serde(default)]
    pub risk: RiskSection,
    #[serde(default)]
    pub regime: RegimeSection,
    #[serde(default)]
    pub momentum: MomentumSection,
    #[serde(default)]
    pub mean_reversion: MeanReversionSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    pub initial_capital: f64,
    pub allocation_fraction: f64,
    pub fee_rate: f64,
    pub fill_exits_at_stop: bool,
    pub atr_period: usize,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            allocation_fraction: 0.20,
            fee_rate: 0.0,
            fill_exits_at_stop: false,
            atr_period: 14,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RiskSection {
    pub atr_stop_multiplier: f64,
    pub max_drawdown_limit: f64,
    pub max_trades_per_day: u32,
    pub cooldown_bars: u32,
}

impl Default for RiskSection {
    fn default() -> Self {
        let defaults = RiskConfig::default();
        Self {
            atr_stop_multiplier: defaults.atr_stop_multiplier,
            max_drawdown_limit: defaults.max_drawdown_limit,
            max_trades_per_day: defaults.max_trades_per_day,
            cooldown_bars: defaults.cooldown_bars,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RegimeSection {
    pub vol_short: usize,
    pub vol_long: usize,
    pub trend_sma: usize,
    pub trend_threshold: f64,
}

impl Default for RegimeSection {
    fn default() -> Self {
        let defaults = RegimeParams::default();
        Self {
            vol_short: defaults.vol_short,
            vol_long: defaults.vol_long,
            trend_sma: defaults.trend_sma,
            trend_threshold: defaults.trend_threshold,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MomentumSection {
    pub mom_period: usize,
    pub rank_period: usize,
    pub entry_z: f64,
    pub exit_z: f64,
    pub rsi_period: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub volume_sma: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for MomentumSection {
    fn default() -> Self {
        let defaults = MomentumParams::default();
        Self {
            mom_period: defaults.mom_period,
            rank_period: defaults.rank_period,
            entry_z: defaults.entry_z,
            exit_z: defaults.exit_z,
            rsi_period: defaults.rsi_period,
            ema_fast: defaults.ema_fast,
            ema_slow: defaults.ema_slow,
            volume_sma: defaults.volume_sma,
            rsi_overbought: defaults.rsi_overbought,
            rsi_oversold: defaults.rsi_oversold,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MeanReversionSection {
    pub bb_period: usize,
    pub bb_std: f64,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub entry_threshold: f64,
    pub exit_threshold: f64,
    pub vol_short: usize,
    pub vol_long: usize,
}

impl Default for MeanReversionSection {
    fn default() -> Self {
        let defaults = MeanReversionParams::default();
        Self {
            bb_period: defaults.bb_period,
            bb_std: defaults.bb_std,
            rsi_period: defaults.rsi_period,
            rsi_oversold: defaults.rsi_oversold,
            rsi_overbought: defaults.rsi_overbought,
            entry_threshold: defaults.entry_threshold,
            exit_threshold: defaults.exit_threshold,
            vol_short: defaults.vol_short,
            vol_long: defaults.vol_long,
        }
    }
}

impl BacktestConfig {
    /// Load from a TOML file path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Convert into the core engine's configuration.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            initial_capital: self.backtest.initial_capital,
            allocation_fraction: self.backtest.allocation_fraction,
            fee_rate: self.backtest.fee_rate,
            fill_exits_at_stop: self.backtest.fill_exits_at_stop,
            atr_period: self.backtest.atr_period,
            risk: RiskConfig {
                atr_stop_multiplier: self.risk.atr_stop_multiplier,
                max_drawdown_limit: self.risk.max_drawdown_limit,
                max_trades_per_day: self.risk.max_trades_per_day,
                cooldown_bars: self.risk.cooldown_bars,
            },
            regime: RegimeParams {
                vol_short: self.regime.vol_short,
                vol_long: self.regime.vol_long,
                trend_sma: self.regime.trend_sma,
                trend_threshold: self.regime.trend_threshold,
            },
            momentum: MomentumParams {
                mom_period: self.momentum.mom_period,
                rank_period: self.momentum.rank_period,
                entry_z: self.momentum.entry_z,
                exit_z: self.momentum.exit_z,
                rsi_period: self.momentum.rsi_period,
                ema_fast: self.momentum.ema_fast,
                ema_slow: self.momentum.ema_slow,
                volume_sma: self.momentum.volume_sma,
                rsi_overbought: self.momentum.rsi_overbought,
                rsi_oversold: self.momentum.rsi_oversold,
            },
            mean_reversion: MeanReversionParams {
                bb_period: self.mean_reversion.bb_period,
                bb_std: self.mean_reversion.bb_std,
                rsi_period: self.mean_reversion.rsi_period,
                rsi_oversold: self.mean_reversion.rsi_oversold,
                rsi_overbought: self.mean_reversion.rsi_overbought,
                entry_threshold: self.mean_reversion.entry_threshold,
                exit_threshold: self.mean_reversion.exit_threshold,
                vol_short: self.mean_reversion.vol_short,
                vol_long: self.mean_reversion.vol_long,
            },
        }
    }
}

/// Config loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("TOML parse error: {0}")]
    Parse(String),
}
