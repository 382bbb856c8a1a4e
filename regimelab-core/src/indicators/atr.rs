//! Average True Range (ATR).
//!
//! True range: max(high - low, |high - prev_close|, |low - prev_close|);
//! on the first bar there is no previous close, so tr = high - low.
//! Primed by averaging the first `period` true ranges, then Wilder-smoothed:
//! atr = (atr * (period - 1) + tr) / period. Ready after `period` bars.

use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<f64>,
    primed_bars: usize,
    current: f64,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            prev_close: None,
            primed_bars: 0,
            current: 0.0,
        }
    }

    pub fn update(&mut self, bar: &Bar) -> f64 {
        let tr = match self.prev_close {
            None => bar.high - bar.low,
            Some(pc) => (bar.high - bar.low)
                .max((bar.high - pc).abs())
                .max((bar.low - pc).abs()),
        };
        self.prev_close = Some(bar.close);

        if self.primed_bars < self.period {
            self.current += tr;
            self.primed_bars += 1;
            if self.primed_bars == self.period {
                self.current /= self.period as f64;
            }
        } else {
            let p = self.period as f64;
            self.current = (self.current * (p - 1.0) + tr) / p;
        }
        self.current
    }

    pub fn value(&self) -> f64 {
        debug_assert!(self.is_ready(), "ATR value read before ready");
        self.current
    }

    pub fn is_ready(&self) -> bool {
        self.primed_bars >= self.period
    }
}
