use serde::{Deserialize, Serialize};

/// Desired position side emitted by a strategy.
///
/// `Flat` means "hold no position"; producers whose indicators are not yet
/// ready must emit `Flat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Long,
    Flat,
    Short,
}

impl Signal {
    /// Signed direction: +1 long, -1 short, 0 flat.
    pub fn sign(self) -> f64 {
        match self {
            Signal::Long => 1.0,
            Signal::Flat => 0.0,
            Signal::Short => -1.0,
        }
    }

    pub fn is_flat(self) -> bool {
        self == Signal::Flat
    }
}
