//! Execution simulator.
//!
//! Holds cash, the current position, at most one pending order, and the
//! closed-trade ledger. Orders submitted while processing bar t are filled
//! at the open of bar t+1 — nothing submitted during a bar can alter state
//! observed during that same bar.

use tracing::debug;

use crate::domain::{Bar, Position, PositionSide, Trade};

/// Float residue guard for "is the position empty".
const QUANTITY_EPSILON: f64 = 1e-9;

/// Side of a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// +1 for buys, -1 for sells.
    pub fn sign(self) -> f64 {
        match self {
            OrderSide::Buy => 1.0,
            OrderSide::Sell => -1.0,
        }
    }

    fn position_side(self) -> PositionSide {
        match self {
            OrderSide::Buy => PositionSide::Long,
            OrderSide::Sell => PositionSide::Short,
        }
    }
}

/// The single pending market order. Settled at the next bar's open, then
/// discarded.
#[derive(Debug, Clone, Copy)]
struct PendingOrder {
    side: OrderSide,
    quantity: f64,
    /// Fill at this price instead of the bar open (stop-price exit variant).
    price_override: Option<f64>,
}

#[derive(Debug)]
pub struct ExecutionSim {
    cash: f64,
    fee_rate: f64,
    position: Position,
    pending: Option<PendingOrder>,
    /// Fee paid on the open leg of the current position, folded into the
    /// trade PnL on close.
    entry_fee: f64,
    trades: Vec<Trade>,
}

impl ExecutionSim {
    pub fn new(initial_capital: f64, fee_rate: f64) -> Self {
        Self {
            cash: initial_capital,
            fee_rate,
            position: Position::flat(),
            pending: None,
            entry_fee: 0.0,
            trades: Vec::new(),
        }
    }

    /// Queue a market order for the next bar's open.
    ///
    /// Submitting twice within one bar is a caller bug; the later order
    /// overwrites the earlier one.
    pub fn submit(&mut self, side: OrderSide, quantity: f64) {
        debug_assert!(
            self.pending.is_none(),
            "order submitted while another is pending"
        );
        debug_assert!(quantity > 0.0, "order quantity must be positive");
        self.pending = Some(PendingOrder { side, quantity, price_override: None });
    }

    /// Queue a market order closing the current position.
    pub fn close_position(&mut self) {
        self.queue_close(None);
    }

    /// Queue a close that fills at an explicit price instead of the next
    /// open (stop-price fill variant).
    pub fn close_position_at(&mut self, price: f64) {
        self.queue_close(Some(price));
    }

    fn queue_close(&mut self, price_override: Option<f64>) {
        debug_assert!(!self.position.is_flat(), "close requested while flat");
        let side = match self.position.side {
            PositionSide::Long => OrderSide::Sell,
            PositionSide::Short => OrderSide::Buy,
            PositionSide::Flat => return,
        };
        debug_assert!(
            self.pending.is_none(),
            "close submitted while another order is pending"
        );
        self.pending = Some(PendingOrder {
            side,
            quantity: self.position.quantity,
            price_override,
        });
    }

    /// Settle the pending order (if any) at this bar's open.
    ///
    /// Called first in every bar's processing, before anything else observes
    /// the bar.
    pub fn settle_fills(&mut self, bar: &Bar) {
        let Some(order) = self.pending.take() else {
            return;
        };
        let price = order.price_override.unwrap_or(bar.open);
        let notional = price * order.quantity;
        let fee = notional * self.fee_rate;
        self.cash -= order.side.sign() * notional + fee;

        if self.position.is_flat() {
            self.position = Position::open(
                order.side.position_side(),
                order.quantity,
                price,
                bar.timestamp,
            );
            self.entry_fee = fee;
            debug!(
                side = ?self.position.side,
                quantity = order.quantity,
                price,
                "position opened"
            );
        } else {
            // Reversals are unsupported: the engine closes and re-enters
            // across two bars, so an order arriving while invested is always
            // the matching close.
            debug_assert!(
                order.side.position_side() != self.position.side,
                "fill would extend the open position"
            );
            debug_assert!(
                (order.quantity - self.position.quantity).abs() <= QUANTITY_EPSILON,
                "close quantity does not match open position"
            );
            let entry = self.position;
            let pnl = entry.side.sign() * (price - entry.entry_price) * entry.quantity
                - self.entry_fee
                - fee;
            self.trades.push(Trade {
                entry_time: entry.entry_time,
                exit_time: bar.timestamp,
                entry_price: entry.entry_price,
                exit_price: price,
                side: entry.side,
                quantity: entry.quantity,
                pnl,
            });
            self.position = Position::flat();
            self.entry_fee = 0.0;
            debug!(pnl, "position closed");
        }
    }

    pub fn is_invested(&self) -> bool {
        self.position.quantity.abs() > QUANTITY_EPSILON
    }

    pub fn has_pending_order(&self) -> bool {
        self.pending.is_some()
    }

    /// Mark-to-market equity at the given price.
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.position.market_value(price)
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(timestamp: i64, open: f64) -> Bar {
        Bar::new(timestamp, open, open + 1.0, open - 1.0, open, 1000.0)
    }

    #[test]
    fn order_fills_at_next_bar_open() {
        let mut sim = ExecutionSim::new(100_000.0, 0.0);
        sim.submit(OrderSide::Buy, 10.0);
        // Nothing settles until the next bar arrives.
        assert!(!sim.is_invested());

        sim.settle_fills(&bar(60, 105.0));
        assert!(sim.is_invested());
        assert_eq!(sim.position().entry_price, 105.0);
        assert_eq!(sim.position().entry_time, 60);
        assert_eq!(sim.cash(), 100_000.0 - 1050.0);
    }

    #[test]
    fn round_trip_emits_trade_with_pnl() {
        let mut sim = ExecutionSim::new(100_000.0, 0.0);
        sim.submit(OrderSide::Buy, 10.0);
        sim.settle_fills(&bar(60, 100.0));

        sim.close_position();
        sim.settle_fills(&bar(120, 110.0));

        assert!(!sim.is_invested());
        assert_eq!(sim.trades().len(), 1);
        let trade = sim.trades()[0];
        assert_eq!(trade.entry_time, 60);
        assert_eq!(trade.exit_time, 120);
        assert_eq!(trade.side, PositionSide::Long);
        assert_eq!(trade.pnl, 100.0);
        assert_eq!(sim.cash(), 100_100.0);
    }

    #[test]
    fn short_round_trip_pnl() {
        let mut sim = ExecutionSim::new(100_000.0, 0.0);
        sim.submit(OrderSide::Sell, 5.0);
        sim.settle_fills(&bar(60, 100.0));
        assert_eq!(sim.cash(), 100_500.0);

        sim.close_position();
        sim.settle_fills(&bar(120, 90.0));
        let trade = sim.trades()[0];
        assert_eq!(trade.side, PositionSide::Short);
        assert_eq!(trade.pnl, 50.0);
        assert_eq!(sim.cash(), 100_050.0);
    }

    #[test]
    fn fees_charged_on_both_legs() {
        let mut sim = ExecutionSim::new(100_000.0, 0.001);
        sim.submit(OrderSide::Buy, 10.0);
        sim.settle_fills(&bar(60, 100.0)); // fee = 1.0
        assert_eq!(sim.cash(), 100_000.0 - 1000.0 - 1.0);

        sim.close_position();
        sim.settle_fills(&bar(120, 100.0)); // fee = 1.0
        let trade = sim.trades()[0];
        // Flat price round trip: PnL is exactly the fees paid.
        assert_eq!(trade.pnl, -2.0);
        assert_eq!(sim.cash(), 100_000.0 - 2.0);
    }

    #[test]
    fn close_at_override_price() {
        let mut sim = ExecutionSim::new(100_000.0, 0.0);
        sim.submit(OrderSide::Buy, 10.0);
        sim.settle_fills(&bar(60, 100.0));

        sim.close_position_at(98.0);
        // The next bar gaps to 95, but the stop-price fill holds at 98.
        sim.settle_fills(&bar(120, 95.0));
        let trade = sim.trades()[0];
        assert_eq!(trade.exit_price, 98.0);
        assert_eq!(trade.pnl, -20.0);
    }

    #[test]
    fn equity_marks_position_to_price() {
        let mut sim = ExecutionSim::new(100_000.0, 0.0);
        assert_eq!(sim.equity(123.0), 100_000.0);

        sim.submit(OrderSide::Buy, 10.0);
        sim.settle_fills(&bar(60, 100.0));
        assert_eq!(sim.equity(100.0), 100_000.0);
        assert_eq!(sim.equity(110.0), 100_100.0);

        let mut short = ExecutionSim::new(100_000.0, 0.0);
        short.submit(OrderSide::Sell, 10.0);
        short.settle_fills(&bar(60, 100.0));
        assert_eq!(short.equity(90.0), 100_100.0);
    }

    #[test]
    fn position_consistency_at_boundaries() {
        let mut sim = ExecutionSim::new(100_000.0, 0.0);
        assert_eq!(sim.position().side, PositionSide::Flat);
        assert_eq!(sim.position().quantity, 0.0);

        sim.submit(OrderSide::Buy, 10.0);
        sim.settle_fills(&bar(60, 100.0));
        assert_eq!(sim.position().side, PositionSide::Long);
        assert!(sim.position().quantity > 0.0);

        sim.close_position();
        sim.settle_fills(&bar(120, 100.0));
        assert_eq!(sim.position().side, PositionSide::Flat);
        assert_eq!(sim.position().quantity, 0.0);
    }
}
