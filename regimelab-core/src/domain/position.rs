//! Position — the instrument exposure currently held by the account.

use serde::{Deserialize, Serialize};

/// Direction of a held position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
    Flat,
}

impl PositionSide {
    /// Signed direction: +1 long, -1 short, 0 flat.
    pub fn sign(self) -> f64 {
        match self {
            PositionSide::Long => 1.0,
            PositionSide::Flat => 0.0,
            PositionSide::Short => -1.0,
        }
    }
}

/// The account's current exposure.
///
/// Invariant: `quantity == 0.0` iff `side == Flat`. The engine never holds
/// more than one position and never reverses direction in a single fill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub side: PositionSide,
    pub quantity: f64,
    pub entry_price: f64,
    pub entry_time: i64,
}

impl Position {
    pub fn flat() -> Self {
        Self {
            side: PositionSide::Flat,
            quantity: 0.0,
            entry_price: 0.0,
            entry_time: 0,
        }
    }

    pub fn open(side: PositionSide, quantity: f64, entry_price: f64, entry_time: i64) -> Self {
        Self { side, quantity, entry_price, entry_time }
    }

    pub fn is_flat(&self) -> bool {
        self.side == PositionSide::Flat
    }

    /// Signed market value at the given price.
    pub fn market_value(&self, price: f64) -> f64 {
        self.side.sign() * self.quantity * price
    }

    /// Unrealized PnL at the given price.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.side.sign() * (price - self.entry_price) * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_position_has_zero_value() {
        let pos = Position::flat();
        assert!(pos.is_flat());
        assert_eq!(pos.market_value(123.0), 0.0);
        assert_eq!(pos.unrealized_pnl(123.0), 0.0);
    }

    #[test]
    fn long_unrealized_pnl() {
        let pos = Position::open(PositionSide::Long, 10.0, 100.0, 0);
        assert_eq!(pos.unrealized_pnl(110.0), 100.0);
    }

    #[test]
    fn short_unrealized_pnl() {
        let pos = Position::open(PositionSide::Short, 10.0, 100.0, 0);
        assert_eq!(pos.unrealized_pnl(90.0), 100.0);
        assert_eq!(pos.market_value(90.0), -900.0);
    }
}
