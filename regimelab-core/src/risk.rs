//! Risk governor: trailing ATR stops, per-day trade cap, post-loss cooldown.
//!
//! The governor sees every bar of an open position (stop checks and trailing
//! updates), every entry (to arm the stop), and every exit outcome (to start
//! the cooldown after losses). Stops ratchet in the favorable direction
//! only.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{Bar, PositionSide};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Trailing stop distance in ATR units.
    pub atr_stop_multiplier: f64,
    /// Peak-to-current equity drawdown beyond which the engine forces flat.
    /// Zero disables the check.
    pub max_drawdown_limit: f64,
    /// Hard cap on entries per calendar day.
    pub max_trades_per_day: u32,
    /// Bars to wait after a losing exit before entering again.
    pub cooldown_bars: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            atr_stop_multiplier: 2.0,
            max_drawdown_limit: 0.10,
            max_trades_per_day: 10,
            cooldown_bars: 5,
        }
    }
}

#[derive(Debug)]
pub struct RiskGovernor {
    config: RiskConfig,

    // Per-position stop state.
    side: PositionSide,
    entry_price: f64,
    stop_price: f64,
    /// Best price seen since entry: highest for longs, lowest for shorts.
    peak_favorable_price: f64,
    atr_at_entry: f64,

    trades_today: u32,
    last_trade_day: Option<NaiveDate>,
    cooldown_remaining: u32,
}

impl RiskGovernor {
    pub fn new(config: RiskConfig) -> Self {
        Self {
            config,
            side: PositionSide::Flat,
            entry_price: 0.0,
            stop_price: 0.0,
            peak_favorable_price: 0.0,
            atr_at_entry: 0.0,
            trades_today: 0,
            last_trade_day: None,
            cooldown_remaining: 0,
        }
    }

    /// True iff a new entry is allowed at this timestamp: under the per-day
    /// cap and not in a post-loss cooldown. The daily counter resets when
    /// the calendar day changes.
    pub fn can_enter(&mut self, timestamp: i64) -> bool {
        let day = day_of(timestamp);
        if self.last_trade_day != Some(day) {
            self.trades_today = 0;
        }
        self.trades_today < self.config.max_trades_per_day && self.cooldown_remaining == 0
    }

    /// Arm the stop for a freshly entered position.
    pub fn on_entry(&mut self, price: f64, atr: f64, side: PositionSide, timestamp: i64) {
        debug_assert!(side != PositionSide::Flat, "entry with flat side");
        self.side = side;
        self.entry_price = price;
        self.peak_favorable_price = price;
        self.atr_at_entry = atr;
        let distance = atr * self.config.atr_stop_multiplier;
        self.stop_price = match side {
            PositionSide::Long => price - distance,
            _ => price + distance,
        };
        self.trades_today += 1;
        self.last_trade_day = Some(day_of(timestamp));
    }

    /// Check the stop against this bar's range, then ratchet it.
    ///
    /// Returns true when the stop is breached; the caller submits the close
    /// (which fills at the next bar's open). The trailing update only ever
    /// tightens: the stop is monotone in the favorable direction.
    pub fn check_exit(&mut self, bar: &Bar) -> bool {
        match self.side {
            PositionSide::Flat => false,
            PositionSide::Long => {
                if bar.low < self.stop_price {
                    return true;
                }
                if bar.high > self.peak_favorable_price {
                    self.peak_favorable_price = bar.high;
                    let trailed = self.peak_favorable_price
                        - self.atr_at_entry * self.config.atr_stop_multiplier;
                    self.stop_price = self.stop_price.max(trailed);
                }
                false
            }
            PositionSide::Short => {
                if bar.high > self.stop_price {
                    return true;
                }
                if bar.low < self.peak_favorable_price {
                    self.peak_favorable_price = bar.low;
                    let trailed = self.peak_favorable_price
                        + self.atr_at_entry * self.config.atr_stop_multiplier;
                    self.stop_price = self.stop_price.min(trailed);
                }
                false
            }
        }
    }

    /// Record an exit. Losing exits start the cooldown.
    pub fn on_exit(&mut self, was_win: bool) {
        self.side = PositionSide::Flat;
        if !was_win {
            self.cooldown_remaining = self.config.cooldown_bars;
        }
    }

    /// Advance the cooldown by one bar. Called once per bar.
    pub fn tick(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }

    pub fn stop_price(&self) -> f64 {
        self.stop_price
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    pub fn trades_today(&self) -> u32 {
        self.trades_today
    }
}

/// UTC calendar day of an epoch timestamp.
fn day_of(timestamp: i64) -> NaiveDate {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive())
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;

    fn bar(high: f64, low: f64) -> Bar {
        let mid = (high + low) / 2.0;
        Bar::new(0, mid, high, low, mid, 1000.0)
    }

    fn governor(config: RiskConfig) -> RiskGovernor {
        RiskGovernor::new(config)
    }

    #[test]
    fn stop_triggers_when_low_breaches() {
        // Long at 100 with ATR 1.0 and multiplier 2.0: stop at 98.
        let mut risk = governor(RiskConfig::default());
        risk.on_entry(100.0, 1.0, PositionSide::Long, 0);
        assert_eq!(risk.stop_price(), 98.0);

        assert!(!risk.check_exit(&bar(100.5, 99.0)));
        assert!(risk.check_exit(&bar(99.0, 97.5)));
    }

    #[test]
    fn short_stop_triggers_when_high_breaches() {
        let mut risk = governor(RiskConfig::default());
        risk.on_entry(100.0, 1.0, PositionSide::Short, 0);
        assert_eq!(risk.stop_price(), 102.0);

        assert!(!risk.check_exit(&bar(101.0, 99.5)));
        assert!(risk.check_exit(&bar(102.5, 100.0)));
    }

    #[test]
    fn trailing_stop_ratchets_up_for_longs() {
        let mut risk = governor(RiskConfig::default());
        risk.on_entry(100.0, 1.0, PositionSide::Long, 0);

        assert!(!risk.check_exit(&bar(104.0, 99.0)));
        assert_eq!(risk.stop_price(), 102.0); // 104 - 2*1.0

        // Price pulls back but stays above the stop: stop must not loosen.
        assert!(!risk.check_exit(&bar(103.0, 102.5)));
        assert_eq!(risk.stop_price(), 102.0);

        // New high ratchets it further.
        assert!(!risk.check_exit(&bar(106.0, 103.0)));
        assert_eq!(risk.stop_price(), 104.0);
    }

    #[test]
    fn trailing_stop_ratchets_down_for_shorts() {
        let mut risk = governor(RiskConfig::default());
        risk.on_entry(100.0, 1.0, PositionSide::Short, 0);

        assert!(!risk.check_exit(&bar(101.0, 96.0)));
        assert_eq!(risk.stop_price(), 98.0); // 96 + 2*1.0

        assert!(!risk.check_exit(&bar(97.5, 97.0)));
        assert_eq!(risk.stop_price(), 98.0);
    }

    #[test]
    fn day_cap_resets_at_midnight() {
        let config = RiskConfig { max_trades_per_day: 2, ..RiskConfig::default() };
        let mut risk = governor(config);

        // Three entry-capable moments within one day: only two may enter.
        assert!(risk.can_enter(1000));
        risk.on_entry(100.0, 1.0, PositionSide::Long, 1000);
        risk.on_exit(true);

        assert!(risk.can_enter(2000));
        risk.on_entry(100.0, 1.0, PositionSide::Long, 2000);
        risk.on_exit(true);

        assert!(!risk.can_enter(3000));

        // Cross midnight: the counter resets.
        assert!(risk.can_enter(1000 + DAY));
    }

    #[test]
    fn losing_exit_starts_cooldown() {
        let config = RiskConfig { cooldown_bars: 3, ..RiskConfig::default() };
        let mut risk = governor(config);

        risk.on_entry(100.0, 1.0, PositionSide::Long, 0);
        risk.on_exit(false);
        assert_eq!(risk.cooldown_remaining(), 3);

        assert!(!risk.can_enter(60));
        risk.tick();
        assert!(!risk.can_enter(120));
        risk.tick();
        assert!(!risk.can_enter(180));
        risk.tick();
        assert!(risk.can_enter(240));
    }

    #[test]
    fn winning_exit_skips_cooldown() {
        let mut risk = governor(RiskConfig::default());
        risk.on_entry(100.0, 1.0, PositionSide::Long, 0);
        risk.on_exit(true);
        assert_eq!(risk.cooldown_remaining(), 0);
        assert!(risk.can_enter(60));
    }

    #[test]
    fn flat_governor_never_exits() {
        let mut risk = governor(RiskConfig::default());
        assert!(!risk.check_exit(&bar(1000.0, 0.5)));
    }
}
