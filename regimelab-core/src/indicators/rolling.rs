//! Rolling window statistics: mean, population stddev, and z-score of the
//! most recent sample.
//!
//! Maintains running sum and sum-of-squares; the oldest sample is evicted
//! before each insertion once the window is full, keeping updates O(1).
//! Round-off can drive the computed variance slightly negative; it is
//! clamped to zero before the square root.

use crate::indicators::Indicator;
use crate::window::RingBuffer;

/// Variance below this is treated as zero when standardizing.
const ZSCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct RollingStats {
    period: usize,
    buffer: RingBuffer<f64>,
    sum: f64,
    sum_sq: f64,
    mean: f64,
    std_dev: f64,
    zscore: f64,
}

impl RollingStats {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "rolling stats period must be >= 1");
        Self {
            period,
            buffer: RingBuffer::with_capacity(period),
            sum: 0.0,
            sum_sq: 0.0,
            mean: 0.0,
            std_dev: 0.0,
            zscore: 0.0,
        }
    }

    pub fn mean(&self) -> f64 {
        debug_assert!(self.is_ready(), "rolling mean read before ready");
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        debug_assert!(self.is_ready(), "rolling stddev read before ready");
        self.std_dev
    }

    /// Standardized deviation of the most recent sample, 0.0 when the window
    /// stddev is below epsilon.
    pub fn zscore(&self) -> f64 {
        debug_assert!(self.is_ready(), "rolling zscore read before ready");
        self.zscore
    }
}

impl Indicator for RollingStats {
    fn update(&mut self, value: f64) -> f64 {
        if self.buffer.is_full() {
            let old = self.buffer.get(self.period - 1);
            self.sum -= old;
            self.sum_sq -= old * old;
        }
        self.buffer.push(value);
        self.sum += value;
        self.sum_sq += value * value;

        let n = self.buffer.len() as f64;
        self.mean = self.sum / n;
        let variance = (self.sum_sq / n - self.mean * self.mean).max(0.0);
        self.std_dev = variance.sqrt();
        self.zscore = if self.std_dev > ZSCORE_EPSILON {
            (value - self.mean) / self.std_dev
        } else {
            0.0
        };
        self.mean
    }

    fn value(&self) -> f64 {
        self.mean()
    }

    fn is_ready(&self) -> bool {
        self.buffer.is_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn mean_and_stddev_hand_computed() {
        let mut stats = RollingStats::new(4);
        for v in [2.0, 4.0, 4.0, 6.0] {
            stats.update(v);
        }
        assert!(stats.is_ready());
        assert_approx(stats.mean(), 4.0, DEFAULT_EPSILON);
        // Population variance: ((2-4)^2 + 0 + 0 + (6-4)^2)/4 = 2
        assert_approx(stats.std_dev(), 2.0_f64.sqrt(), DEFAULT_EPSILON);
        // z of last sample 6: (6-4)/sqrt(2)
        assert_approx(stats.zscore(), 2.0 / 2.0_f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn eviction_keeps_window_stats() {
        let mut stats = RollingStats::new(3);
        for v in [10.0, 20.0, 30.0, 40.0] {
            stats.update(v);
        }
        // window [20, 30, 40]
        assert_approx(stats.mean(), 30.0, DEFAULT_EPSILON);
        let expected_var = ((20.0_f64 - 30.0).powi(2) + 0.0 + 10.0_f64.powi(2)) / 3.0;
        assert_approx(stats.std_dev(), expected_var.sqrt(), 1e-9);
    }

    #[test]
    fn constant_window_has_zero_z() {
        let mut stats = RollingStats::new(5);
        for _ in 0..10 {
            stats.update(7.0);
        }
        assert_approx(stats.std_dev(), 0.0, 1e-9);
        assert_eq!(stats.zscore(), 0.0);
    }
}
