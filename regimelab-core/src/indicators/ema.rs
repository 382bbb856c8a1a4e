//! Exponential Moving Average (EMA).
//!
//! Conventional smoothed form with alpha = 2 / (period + 1), seeded with the
//! first observation. The seed choice is contractual: reproducing a run
//! requires the exact same warmup values, so the seed must never change.

use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    state: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            alpha: 2.0 / (period as f64 + 1.0),
            state: None,
        }
    }
}

impl Indicator for Ema {
    fn update(&mut self, value: f64) -> f64 {
        let next = match self.state {
            None => value,
            Some(prev) => self.alpha * value + (1.0 - self.alpha) * prev,
        };
        self.state = Some(next);
        next
    }

    fn value(&self) -> f64 {
        debug_assert!(self.is_ready(), "EMA value read before ready");
        self.state.unwrap_or(0.0)
    }

    fn is_ready(&self) -> bool {
        self.state.is_some()
    }
}
