//! Simple Moving Average (SMA).
//!
//! Running-sum form: evict the oldest sample before adding the new one, so
//! each update is O(1) regardless of period.

use crate::indicators::Indicator;
use crate::window::RingBuffer;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    sum: f64,
    buffer: RingBuffer<f64>,
    current: f64,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            sum: 0.0,
            buffer: RingBuffer::with_capacity(period),
            current: 0.0,
        }
    }
}

impl Indicator for Sma {
    fn update(&mut self, value: f64) -> f64 {
        if self.buffer.is_full() {
            self.sum -= self.buffer.get(self.period - 1);
        }
        self.buffer.push(value);
        self.sum += value;
        self.current = self.sum / self.buffer.len() as f64;
        self.current
    }

    fn value(&self) -> f64 {
        debug_assert!(self.is_ready(), "SMA value read before ready");
        self.current
    }

    fn is_ready(&self) -> bool {
        self.buffer.is_full()
    }
}
