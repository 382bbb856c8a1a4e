//! Mean-reversion signal producer.
//!
//! Trades band extremes back toward the basis: entries require the close to
//! sit deep in the Bollinger envelope, an extreme RSI, and recent volatility
//! below longer-horizon volatility (reversion works poorly in expanding
//! vol). Exits fire when the position within the bands crosses back past
//! the exit threshold on the far side of the basis.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Bar, Signal};
use crate::indicators::{BollingerBands, Indicator, RollingStats, Rsi};
use crate::strategy::Strategy;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeanReversionParams {
    pub bb_period: usize,
    /// Band half-width in standard deviations.
    pub bb_std: f64,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// |band position| beyond which entries arm. Band position is measured
    /// in half-widths from the basis: -1 at the lower band, +1 at the upper.
    pub entry_threshold: f64,
    /// Band position past which (on the opposite side) an open position
    /// exits.
    pub exit_threshold: f64,
    /// Short volatility window over log-returns.
    pub vol_short: usize,
    /// Long volatility window over log-returns.
    pub vol_long: usize,
}

impl Default for MeanReversionParams {
    fn default() -> Self {
        Self {
            bb_period: 100,
            bb_std: 2.0,
            rsi_period: 20,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            entry_threshold: 0.8,
            exit_threshold: 0.1,
            vol_short: 20,
            vol_long: 60,
        }
    }
}

#[derive(Debug)]
pub struct MeanReversionStrategy {
    params: MeanReversionParams,
    bands: BollingerBands,
    rsi: Rsi,
    vol_short: RollingStats,
    vol_long: RollingStats,
    last_close: Option<f64>,
    current: Signal,
}

impl MeanReversionStrategy {
    pub fn new(params: MeanReversionParams) -> Self {
        Self {
            bands: BollingerBands::new(params.bb_period, params.bb_std),
            rsi: Rsi::new(params.rsi_period),
            vol_short: RollingStats::new(params.vol_short),
            vol_long: RollingStats::new(params.vol_long),
            last_close: None,
            current: Signal::Flat,
            params,
        }
    }
}

impl Strategy for MeanReversionStrategy {
    fn on_bar(&mut self, bar: &Bar) {
        let bands = self.bands.update(bar.close);
        self.rsi.update(bar.close);

        if let Some(prev) = self.last_close {
            let log_ret = if prev > 0.0 && bar.close > 0.0 {
                (bar.close / prev).ln()
            } else {
                warn!(prev_close = prev, close = bar.close, "undefined log-return, using 0");
                0.0
            };
            self.vol_short.update(log_ret);
            self.vol_long.update(log_ret);
        }
        self.last_close = Some(bar.close);

        if !self.bands.is_ready() || !self.rsi.is_ready() || !self.vol_long.is_ready() {
            return;
        }

        // Position within the bands, in half-widths from the basis.
        let std_dev = (bands.upper - bands.middle) / self.params.bb_std;
        let bb_pos = if std_dev > 0.0 {
            (bar.close - bands.middle) / (self.params.bb_std * std_dev)
        } else {
            0.0
        };

        let rsi = self.rsi.value();
        let low_vol = self.vol_short.std_dev() < self.vol_long.std_dev();

        let long_entry =
            bb_pos < -self.params.entry_threshold && rsi < self.params.rsi_oversold && low_vol;
        let short_entry =
            bb_pos > self.params.entry_threshold && rsi > self.params.rsi_overbought && low_vol;

        if long_entry {
            self.current = Signal::Long;
        } else if short_entry {
            self.current = Signal::Short;
        } else if self.current == Signal::Long && bb_pos > self.params.exit_threshold {
            self.current = Signal::Flat;
        } else if self.current == Signal::Short && bb_pos < -self.params.exit_threshold {
            self.current = Signal::Flat;
        }
        // Otherwise hold.
    }

    fn signal(&self) -> Signal {
        self.current
    }

    fn name(&self) -> &'static str {
        "mean_reversion"
    }
}
