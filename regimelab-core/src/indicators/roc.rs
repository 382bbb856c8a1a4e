//! Rate of Change (ROC): (current - price_n_bars_ago) / price_n_bars_ago.
//!
//! Needs a window of period + 1 samples; returns 0.0 while warming up and
//! when the reference price is zero.

use crate::indicators::Indicator;
use crate::window::RingBuffer;

#[derive(Debug, Clone)]
pub struct Roc {
    period: usize,
    buffer: RingBuffer<f64>,
    current: f64,
}

impl Roc {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ROC period must be >= 1");
        Self {
            period,
            buffer: RingBuffer::with_capacity(period + 1),
            current: 0.0,
        }
    }
}

impl Indicator for Roc {
    fn update(&mut self, value: f64) -> f64 {
        self.buffer.push(value);
        if self.buffer.len() <= self.period {
            return 0.0;
        }
        let reference = self.buffer.get(self.period);
        self.current = if reference != 0.0 {
            (value - reference) / reference
        } else {
            0.0
        };
        self.current
    }

    fn value(&self) -> f64 {
        debug_assert!(self.is_ready(), "ROC value read before ready");
        self.current
    }

    fn is_ready(&self) -> bool {
        self.buffer.len() > self.period
    }
}
