//! Signal producers.
//!
//! Three producers share the `Strategy` contract: the regime detector (which
//! classifies but never trades), the momentum producer (active in trending
//! regimes), and the mean-reversion producer (active in low-volatility
//! ranges). The engine owns all three concretely and selects which signal to
//! act on by regime; producers themselves are regime-blind.

pub mod mean_reversion;
pub mod momentum;
pub mod regime;

pub use mean_reversion::{MeanReversionParams, MeanReversionStrategy};
pub use momentum::{MomentumParams, MomentumStrategy};
pub use regime::{RegimeDetector, RegimeParams};

use crate::domain::{Bar, Signal};

/// Contract shared by all signal producers.
///
/// A producer whose indicators are not yet ready must report `Signal::Flat`.
pub trait Strategy {
    /// Called once per bar, in order, with the latest bar.
    fn on_bar(&mut self, bar: &Bar);

    /// Desired position side after the most recent bar.
    fn signal(&self) -> Signal;

    fn name(&self) -> &'static str;
}
