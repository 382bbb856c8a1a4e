//! Domain types shared across the engine: bars, signals, positions, trades,
//! and the market-regime taxonomy.

pub mod bar;
pub mod position;
pub mod regime;
pub mod signal;
pub mod trade;

pub use bar::{Bar, BarError};
pub use position::{Position, PositionSide};
pub use regime::Regime;
pub use signal::Signal;
pub use trade::Trade;
