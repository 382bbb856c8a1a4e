use crate::domain::PositionSide;
use serde::{Deserialize, Serialize};

/// Closed round-trip trade record.
///
/// Emitted by the execution simulator when a position transitions to flat;
/// append-only, never mutated afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub entry_time: i64,
    pub exit_time: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub side: PositionSide,
    pub quantity: f64,
    /// Realized PnL: side * (exit - entry) * quantity, net of fees.
    pub pnl: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}
