//! Relative Strength Index (RSI) with Wilder's smoothing.
//!
//! Primed by summing gains and losses over the first `period` price deltas,
//! then Wilder-smoothed: avg = (avg * (period - 1) + sample) / period.
//! Ready after `period` deltas, i.e. `period + 1` prices. When the average
//! loss is zero the RSI saturates at 100.

use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    avg_gain: f64,
    avg_loss: f64,
    prev_price: Option<f64>,
    primed_deltas: usize,
    current: f64,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            avg_gain: 0.0,
            avg_loss: 0.0,
            prev_price: None,
            primed_deltas: 0,
            current: 0.0,
        }
    }
}

impl Indicator for Rsi {
    fn update(&mut self, value: f64) -> f64 {
        let prev = match self.prev_price {
            None => {
                self.prev_price = Some(value);
                return 0.0;
            }
            Some(p) => p,
        };

        let change = value - prev;
        self.prev_price = Some(value);

        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if self.primed_deltas < self.period {
            self.avg_gain += gain;
            self.avg_loss += loss;
            self.primed_deltas += 1;
            if self.primed_deltas == self.period {
                self.avg_gain /= self.period as f64;
                self.avg_loss /= self.period as f64;
            } else {
                return 0.0;
            }
        } else {
            let p = self.period as f64;
            self.avg_gain = (self.avg_gain * (p - 1.0) + gain) / p;
            self.avg_loss = (self.avg_loss * (p - 1.0) + loss) / p;
        }

        self.current = if self.avg_loss == 0.0 {
            100.0
        } else {
            let rs = self.avg_gain / self.avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        };
        self.current
    }

    fn value(&self) -> f64 {
        debug_assert!(self.is_ready(), "RSI value read before ready");
        self.current
    }

    fn is_ready(&self) -> bool {
        self.primed_deltas >= self.period
    }
}
