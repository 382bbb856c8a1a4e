//! Bollinger bands.
//!
//! Middle band is the SMA of the window; the band half-width is k population
//! standard deviations around that basis, computed from running sum and
//! sum-of-squares so each update stays O(1). Until the window fills the
//! variance is reported as zero and the bands collapse onto the basis.

use crate::window::RingBuffer;

/// Band values for the most recent sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// Position of the sample within the bands: (x - lower)/(upper - lower),
    /// 0.5 when the bands coincide.
    pub percent_b: f64,
}

#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    mult: f64,
    buffer: RingBuffer<f64>,
    sum: f64,
    sum_sq: f64,
    current: Bands,
}

impl BollingerBands {
    pub fn new(period: usize, mult: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            mult,
            buffer: RingBuffer::with_capacity(period),
            sum: 0.0,
            sum_sq: 0.0,
            current: Bands { upper: 0.0, middle: 0.0, lower: 0.0, percent_b: 0.5 },
        }
    }

    pub fn update(&mut self, value: f64) -> Bands {
        if self.buffer.is_full() {
            let old = self.buffer.get(self.period - 1);
            self.sum -= old;
            self.sum_sq -= old * old;
        }
        self.buffer.push(value);
        self.sum += value;
        self.sum_sq += value * value;

        let n = self.buffer.len() as f64;
        let basis = self.sum / n;
        let variance = if self.buffer.is_full() {
            (self.sum_sq / n - basis * basis).max(0.0)
        } else {
            0.0
        };
        let std_dev = variance.sqrt();

        let upper = basis + self.mult * std_dev;
        let lower = basis - self.mult * std_dev;
        let percent_b = if upper != lower {
            (value - lower) / (upper - lower)
        } else {
            0.5
        };

        self.current = Bands { upper, middle: basis, lower, percent_b };
        self.current
    }

    pub fn value(&self) -> Bands {
        debug_assert!(self.is_ready(), "Bollinger bands read before ready");
        self.current
    }

    pub fn is_ready(&self) -> bool {
        self.buffer.is_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bands_hand_computed() {
        let mut bb = BollingerBands::new(4, 2.0);
        for v in [2.0, 4.0, 4.0, 6.0] {
            bb.update(v);
        }
        assert!(bb.is_ready());
        let bands = bb.value();
        // basis = 4, population std = sqrt(2)
        assert_approx(bands.middle, 4.0, DEFAULT_EPSILON);
        assert_approx(bands.upper, 4.0 + 2.0 * 2.0_f64.sqrt(), 1e-9);
        assert_approx(bands.lower, 4.0 - 2.0 * 2.0_f64.sqrt(), 1e-9);
        // %b of 6: (6 - lower)/(upper - lower)
        let expected = (6.0 - bands.lower) / (bands.upper - bands.lower);
        assert_approx(bands.percent_b, expected, 1e-12);
    }

    #[test]
    fn coincident_bands_report_midpoint() {
        let mut bb = BollingerBands::new(3, 2.0);
        for _ in 0..5 {
            bb.update(100.0);
        }
        let bands = bb.value();
        assert_approx(bands.upper, bands.lower, 1e-12);
        assert_eq!(bands.percent_b, 0.5);
    }

    #[test]
    fn not_ready_until_window_full() {
        let mut bb = BollingerBands::new(5, 2.0);
        for v in [1.0, 2.0, 3.0, 4.0] {
            bb.update(v);
        }
        assert!(!bb.is_ready());
        bb.update(5.0);
        assert!(bb.is_ready());
    }

    #[test]
    fn eviction_matches_fresh_window() {
        let mut bb = BollingerBands::new(3, 2.0);
        for v in [50.0, 1.0, 2.0, 3.0] {
            bb.update(v);
        }
        // window is [1, 2, 3]: basis 2, var = 2/3
        let bands = bb.value();
        assert_approx(bands.middle, 2.0, 1e-9);
        assert_approx(bands.upper, 2.0 + 2.0 * (2.0_f64 / 3.0).sqrt(), 1e-9);
    }
}
