//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Ring buffer behaves like a Vec-backed model
//! 2. Streaming indicators match batch computations over the same prefix
//! 3. Cash conservation — the equity identity holds after every round trip
//! 4. Position consistency — quantity is zero iff the side is flat

use proptest::prelude::*;

use regimelab_core::domain::{Bar, PositionSide};
use regimelab_core::execution::{ExecutionSim, OrderSide};
use regimelab_core::indicators::{Indicator, Roc, RollingStats, Rsi, Sma};
use regimelab_core::window::RingBuffer;

fn arb_prices(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(10.0..500.0f64, 2..len)
}

// ── 1. Ring buffer model equivalence ─────────────────────────────────

proptest! {
    /// Logical indexing must match a Vec model holding the last `capacity`
    /// pushes, newest first.
    #[test]
    fn ring_buffer_matches_vec_model(
        values in prop::collection::vec(-1000.0..1000.0f64, 1..50),
        capacity in 1usize..8,
    ) {
        let mut rb = RingBuffer::with_capacity(capacity);
        let mut model: Vec<f64> = Vec::new();

        for &v in &values {
            rb.push(v);
            model.push(v);

            let expected_len = model.len().min(capacity);
            prop_assert_eq!(rb.len(), expected_len);
            prop_assert_eq!(rb.is_full(), model.len() >= capacity);

            for i in 0..expected_len {
                let expected = model[model.len() - 1 - i];
                prop_assert_eq!(rb.get(i), expected);
            }
        }
    }
}

// ── 2. Streaming vs batch equivalence ────────────────────────────────

proptest! {
    /// Streaming SMA equals the arithmetic mean of the trailing window.
    #[test]
    fn sma_matches_batch(prices in arb_prices(60), period in 1usize..10) {
        let mut sma = Sma::new(period);
        for (i, &p) in prices.iter().enumerate() {
            sma.update(p);
            if i + 1 >= period {
                let window = &prices[i + 1 - period..=i];
                let batch = window.iter().sum::<f64>() / period as f64;
                prop_assert!(sma.is_ready());
                prop_assert!((sma.value() - batch).abs() < 1e-9);
            } else {
                prop_assert!(!sma.is_ready());
            }
        }
    }

    /// Streaming rolling mean/stddev equal the population statistics of the
    /// trailing window.
    #[test]
    fn rolling_stats_match_batch(prices in arb_prices(60), period in 1usize..10) {
        let mut stats = RollingStats::new(period);
        for (i, &p) in prices.iter().enumerate() {
            stats.update(p);
            if i + 1 >= period {
                let window = &prices[i + 1 - period..=i];
                let mean = window.iter().sum::<f64>() / period as f64;
                let var = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
                    / period as f64;
                prop_assert!((stats.mean() - mean).abs() < 1e-9);
                prop_assert!((stats.std_dev() - var.sqrt()).abs() < 1e-6);
            }
        }
    }

    /// Streaming ROC equals the batch (current - oldest)/oldest over a
    /// period+1 window.
    #[test]
    fn roc_matches_batch(prices in arb_prices(60), period in 1usize..10) {
        let mut roc = Roc::new(period);
        for (i, &p) in prices.iter().enumerate() {
            roc.update(p);
            if i >= period {
                let reference = prices[i - period];
                let batch = (p - reference) / reference;
                prop_assert!(roc.is_ready());
                prop_assert!((roc.value() - batch).abs() < 1e-9);
            } else {
                prop_assert!(!roc.is_ready());
            }
        }
    }

    /// Streaming RSI equals a batch Wilder computation over the same prefix.
    #[test]
    fn rsi_matches_batch_wilder(prices in arb_prices(60), period in 1usize..8) {
        let mut rsi = Rsi::new(period);
        for &p in &prices {
            rsi.update(p);
        }

        if prices.len() > period {
            // Batch reference: prime over the first `period` deltas, then
            // Wilder-smooth the remainder.
            let deltas: Vec<f64> =
                prices.windows(2).map(|w| w[1] - w[0]).collect();
            let mut avg_gain =
                deltas[..period].iter().map(|d| d.max(0.0)).sum::<f64>() / period as f64;
            let mut avg_loss =
                deltas[..period].iter().map(|d| (-d).max(0.0)).sum::<f64>() / period as f64;
            for d in &deltas[period..] {
                let p = period as f64;
                avg_gain = (avg_gain * (p - 1.0) + d.max(0.0)) / p;
                avg_loss = (avg_loss * (p - 1.0) + (-d).max(0.0)) / p;
            }
            let expected = if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
            };
            prop_assert!(rsi.is_ready());
            prop_assert!((rsi.value() - expected).abs() < 1e-9);
        } else {
            prop_assert!(!rsi.is_ready());
        }
    }
}

// ── 3 & 4. Accounting identities ─────────────────────────────────────

fn fill_bar(timestamp: i64, open: f64) -> Bar {
    Bar::new(timestamp, open, open + 1.0, open - 1.0, open, 1000.0)
}

proptest! {
    /// At zero fees, equity always equals initial capital plus realized PnL
    /// plus unrealized PnL, and the position is empty exactly when flat.
    #[test]
    fn cash_conservation_over_round_trips(
        opens in prop::collection::vec(50.0..150.0f64, 2..24),
        quantity in 1.0..100.0f64,
        go_short in prop::bool::ANY,
    ) {
        let initial = 100_000.0;
        let mut sim = ExecutionSim::new(initial, 0.0);
        let side = if go_short { OrderSide::Sell } else { OrderSide::Buy };

        for (i, &open) in opens.iter().enumerate() {
            // Alternate: submit an entry on even bars, a close on odd bars,
            // so each pending order settles on the following bar.
            let bar = fill_bar(i as i64 * 60, open);
            sim.settle_fills(&bar);

            // Invariant 4: quantity and side agree at every bar boundary.
            prop_assert_eq!(
                sim.position().quantity == 0.0,
                sim.position().side == PositionSide::Flat
            );

            // Invariant 3: equity identity at this bar's price.
            let realized: f64 = sim.trades().iter().map(|t| t.pnl).sum();
            let unrealized = sim.position().unrealized_pnl(open);
            let identity = initial + realized + unrealized;
            prop_assert!(
                (sim.equity(open) - identity).abs() <= 1e-6 * identity.abs().max(1.0),
                "equity {} != identity {}",
                sim.equity(open),
                identity
            );

            if i % 2 == 0 {
                sim.submit(side, quantity);
            } else {
                sim.close_position();
            }
        }
    }

    /// Every fill price is the open of the bar that settles it, never a
    /// price from the submitting bar.
    #[test]
    fn fills_only_happen_at_next_open(
        opens in prop::collection::vec(50.0..150.0f64, 4..20),
    ) {
        let mut sim = ExecutionSim::new(100_000.0, 0.0);
        let mut submitted_last_bar = false;

        for (i, &open) in opens.iter().enumerate() {
            let bar = fill_bar(i as i64 * 60, open);
            sim.settle_fills(&bar);

            if submitted_last_bar {
                // The order submitted last bar must have filled at THIS open.
                prop_assert!(sim.is_invested());
                prop_assert_eq!(sim.position().entry_price, open);
                sim.close_position();
                submitted_last_bar = false;
            } else if !sim.is_invested() && !sim.has_pending_order() {
                sim.submit(OrderSide::Buy, 10.0);
                submitted_last_bar = true;
            }
        }
    }
}
