//! Market regime detector.
//!
//! Classifies each bar into trending/ranging crossed with low/high
//! volatility. Volatility is the rolling stddev of log-returns over a short
//! and a long window; trend strength is the relative distance of the close
//! from a slow SMA. The detector never emits a trade signal itself.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Bar, Regime, Signal};
use crate::indicators::{Indicator, RollingStats, Sma};
use crate::strategy::Strategy;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegimeParams {
    /// Short volatility window (bars of log-returns).
    pub vol_short: usize,
    /// Long volatility window.
    pub vol_long: usize,
    /// Trend SMA window (closes).
    pub trend_sma: usize,
    /// Relative distance from the trend SMA above which the market counts
    /// as trending.
    pub trend_threshold: f64,
}

impl Default for RegimeParams {
    fn default() -> Self {
        Self {
            vol_short: 50,
            vol_long: 200,
            trend_sma: 300,
            trend_threshold: 0.005,
        }
    }
}

#[derive(Debug)]
pub struct RegimeDetector {
    params: RegimeParams,
    vol_short: RollingStats,
    vol_long: RollingStats,
    trend_sma: Sma,
    last_close: Option<f64>,
    current: Regime,
}

impl RegimeDetector {
    pub fn new(params: RegimeParams) -> Self {
        Self {
            vol_short: RollingStats::new(params.vol_short),
            vol_long: RollingStats::new(params.vol_long),
            trend_sma: Sma::new(params.trend_sma),
            last_close: None,
            current: Regime::Undefined,
            params,
        }
    }

    pub fn regime(&self) -> Regime {
        self.current
    }
}

impl Strategy for RegimeDetector {
    fn on_bar(&mut self, bar: &Bar) {
        // Volatility windows run on log-returns, which need a previous close.
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

        self.trend_sma.update(bar.close);

        if !self.vol_short.is_ready() || !self.vol_long.is_ready() || !self.trend_sma.is_ready() {
            return;
        }

        // Equal stddevs (the degenerate flat-tape case) count as low
        // volatility.
        let low_vol = self.vol_short.std_dev() <= self.vol_long.std_dev();

        let sma = self.trend_sma.value();
        let trend_strength = (bar.close - sma).abs() / sma;
        let trending = trend_strength > self.params.trend_threshold;

        self.current = match (low_vol, trending) {
            (true, true) => Regime::LvTrend,
            (false, true) => Regime::HvTrend,
            (true, false) => Regime::LvRange,
            (false, false) => Regime::HvRange,
        };
    }

    fn signal(&self) -> Signal {
        Signal::Flat
    }

    fn name(&self) -> &'static str {
        "regime_detector"
    }
}
