//! Streaming indicators.
//!
//! Every indicator is a stateful accumulator updated once per bar in O(1),
//! allocating only at construction. After enough updates the indicator
//! reports `is_ready() == true`; `value()` is undefined before that and
//! callers must gate on readiness.
//!
//! All indicators are deterministic: identical input sequences produce
//! identical outputs, and each matches a batch computation over the same
//! prefix (EMA excepted — its first-observation seed is contractual).
//!
//! `Atr` consumes whole bars and `BollingerBands` yields a band tuple, so
//! they expose the same update/value/ready shape as inherent methods rather
//! than through the scalar `Indicator` trait.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod roc;
pub mod rolling;
pub mod rsi;
pub mod sma;

pub use atr::Atr;
pub use bollinger::{Bands, BollingerBands};
pub use ema::Ema;
pub use roc::Roc;
pub use rolling::RollingStats;
pub use rsi::Rsi;
pub use sma::Sma;

/// Contract shared by the scalar streaming indicators.
pub trait Indicator {
    /// Feed the next sample; returns the current value (0.0 while warming up).
    fn update(&mut self, value: f64) -> f64;

    /// Current value. Undefined before `is_ready()`.
    fn value(&self) -> f64;

    /// True once the warmup window has filled.
    fn is_ready(&self) -> bool;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
