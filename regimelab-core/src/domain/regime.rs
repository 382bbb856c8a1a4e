use serde::{Deserialize, Serialize};

/// Coarse classification of recent market behavior: trending vs ranging,
/// crossed with low vs high volatility.
///
/// `Undefined` until the regime detector's indicator windows have filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    /// Low volatility, trending.
    LvTrend,
    /// High volatility, trending.
    HvTrend,
    /// Low volatility, ranging.
    LvRange,
    /// High volatility, ranging. The dispatcher stays in cash here.
    HvRange,
    Undefined,
}

impl Regime {
    pub fn is_trending(self) -> bool {
        matches!(self, Regime::LvTrend | Regime::HvTrend)
    }
}
