use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Single OHLCV bar. Timestamp is Unix epoch seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self { timestamp, open, high, low, close, volume }
    }

    /// Validate bar invariants.
    ///
    /// A bar that fails here is skipped by the engine (logged, counted),
    /// never processed.
    pub fn validate(&self) -> Result<(), BarError> {
        if self.high < self.low {
            return Err(BarError::InvalidRange { high: self.high, low: self.low });
        }
        if self.open <= 0.0 {
            return Err(BarError::NonPositiveOpen { open: self.open });
        }
        if self.high < 0.0 || self.low < 0.0 || self.close < 0.0 {
            return Err(BarError::NegativePrice);
        }
        if self.volume < 0.0 {
            return Err(BarError::NegativeVolume);
        }
        if !(self.low..=self.high).contains(&self.open) {
            return Err(BarError::OpenOutOfRange);
        }
        if !(self.low..=self.high).contains(&self.close) {
            return Err(BarError::CloseOutOfRange);
        }
        Ok(())
    }

    /// Bar range (high - low).
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

#[derive(Debug, Error)]
pub enum BarError {
    #[error("invalid bar range: high={high}, low={low}")]
    InvalidRange { high: f64, low: f64 },

    #[error("open must be positive, got {open}")]
    NonPositiveOpen { open: f64 },

    #[error("negative price not allowed")]
    NegativePrice,

    #[error("negative volume not allowed")]
    NegativeVolume,

    #[error("open price outside high/low range")]
    OpenOutOfRange,

    #[error("close price outside high/low range")]
    CloseOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_bar_passes() {
        let bar = Bar::new(1, 100.0, 105.0, 95.0, 102.0, 1000.0);
        assert!(bar.validate().is_ok());
    }

    #[test]
    fn inverted_range_rejected() {
        let bar = Bar::new(1, 100.0, 99.0, 101.0, 100.0, 1000.0);
        assert!(matches!(bar.validate(), Err(BarError::InvalidRange { .. })));
    }

    #[test]
    fn non_positive_open_rejected() {
        let bar = Bar::new(1, 0.0, 1.0, 0.0, 0.5, 1000.0);
        assert!(matches!(bar.validate(), Err(BarError::NonPositiveOpen { .. })));
    }

    #[test]
    fn negative_volume_rejected() {
        let bar = Bar::new(1, 100.0, 105.0, 95.0, 102.0, -1.0);
        assert!(matches!(bar.validate(), Err(BarError::NegativeVolume)));
    }

    #[test]
    fn close_outside_range_rejected() {
        let bar = Bar::new(1, 100.0, 105.0, 95.0, 110.0, 1000.0);
        assert!(matches!(bar.validate(), Err(BarError::CloseOutOfRange)));
    }
}
