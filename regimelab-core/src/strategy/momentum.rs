//! Momentum signal producer.
//!
//! Core signal is the z-score of the rate-of-change series (momentum rank).
//! Entries additionally require trend confirmation (fast EMA vs slow EMA),
//! above-average volume, a non-extreme RSI, and momentum acceleration
//! (z-score moving further in the entry direction than on the previous bar).
//! When |z| decays below the exit threshold the signal collapses to flat;
//! otherwise the previous signal is held.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Signal};
use crate::indicators::{Ema, Indicator, Roc, RollingStats, Rsi, Sma};
use crate::strategy::Strategy;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MomentumParams {
    /// ROC lookback in bars.
    pub mom_period: usize,
    /// Window for standardizing the ROC series.
    pub rank_period: usize,
    /// Entry threshold on the momentum z-score.
    pub entry_z: f64,
    /// |z| below this forces the signal flat.
    pub exit_z: f64,
    pub rsi_period: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    /// Volume SMA window for the above-average-volume filter.
    pub volume_sma: usize,
    /// Longs are blocked at or above this RSI.
    pub rsi_overbought: f64,
    /// Shorts are blocked at or below this RSI.
    pub rsi_oversold: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            mom_period: 100,
            rank_period: 100,
            entry_z: 1.5,
            exit_z: 0.3,
            rsi_period: 14,
            ema_fast: 12,
            ema_slow: 26,
            volume_sma: 20,
            rsi_overbought: 75.0,
            rsi_oversold: 25.0,
        }
    }
}

#[derive(Debug)]
pub struct MomentumStrategy {
    params: MomentumParams,
    roc: Roc,
    roc_rank: RollingStats,
    ema_fast: Ema,
    ema_slow: Ema,
    volume_sma: Sma,
    rsi: Rsi,
    last_z: f64,
    current: Signal,
}

impl MomentumStrategy {
    pub fn new(params: MomentumParams) -> Self {
        Self {
            roc: Roc::new(params.mom_period),
            roc_rank: RollingStats::new(params.rank_period),
            ema_fast: Ema::new(params.ema_fast),
            ema_slow: Ema::new(params.ema_slow),
            volume_sma: Sma::new(params.volume_sma),
            rsi: Rsi::new(params.rsi_period),
            last_z: 0.0,
            current: Signal::Flat,
            params,
        }
    }
}

impl Strategy for MomentumStrategy {
    fn on_bar(&mut self, bar: &Bar) {
        // The ROC warmup output (0.0) feeds the rank window like any other
        // sample, so the rank window fills on a fixed schedule.
        let mom = self.roc.update(bar.close);
        self.roc_rank.update(mom);

        self.ema_fast.update(bar.close);
        self.ema_slow.update(bar.close);
        self.volume_sma.update(bar.volume);
        self.rsi.update(bar.close);

        if !self.roc_rank.is_ready()
            || !self.ema_slow.is_ready()
            || !self.volume_sma.is_ready()
            || !self.rsi.is_ready()
        {
            return;
        }

        let z = self.roc_rank.zscore();
        let rsi = self.rsi.value();

        let trend_up = self.ema_fast.value() > self.ema_slow.value();
        let trend_down = self.ema_fast.value() < self.ema_slow.value();
        let high_volume = bar.volume > self.volume_sma.value();

        // Acceleration is measured against the previous bar's z-score.
        let accelerating = z > self.last_z;
        let decelerating = z < self.last_z;
        self.last_z = z;

        let long_entry = z > self.params.entry_z
            && trend_up
            && high_volume
            && rsi < self.params.rsi_overbought
            && accelerating;
        let short_entry = z < -self.params.entry_z
            && trend_down
            && high_volume
            && rsi > self.params.rsi_oversold
            && decelerating;

        if long_entry {
            self.current = Signal::Long;
        } else if short_entry {
            self.current = Signal::Short;
        } else if z.abs() < self.params.exit_z {
            // Momentum weakening: force flat.
            self.current = Signal::Flat;
        }
        // Otherwise hold the previous signal.
    }

    fn signal(&self) -> Signal {
        self.current
    }

    fn name(&self) -> &'static str {
        "momentum"
    }
}
