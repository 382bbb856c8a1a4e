//! End-of-run performance report.
//!
//! Pure functions of the trade ledger and final equity; no dependency on
//! engine internals.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::Trade;

/// Sentinel profit factor for runs with no gross loss.
const PROFIT_FACTOR_SENTINEL: f64 = 99.9;

/// Aggregate statistics for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub final_equity: f64,
    pub total_return_pct: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    /// Percentage of trades with positive PnL.
    pub win_rate: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    /// gross_profit / gross_loss, or the sentinel when there is no loss.
    pub profit_factor: f64,
    pub duration_ms: f64,
    pub bars_per_sec: f64,
}

impl RunReport {
    pub fn compute(
        trades: &[Trade],
        final_equity: f64,
        initial_capital: f64,
        bars_processed: usize,
        elapsed: Duration,
    ) -> Self {
        let mut winning_trades = 0;
        let mut gross_profit = 0.0;
        let mut gross_loss = 0.0;
        for trade in trades {
            if trade.pnl > 0.0 {
                winning_trades += 1;
                gross_profit += trade.pnl;
            } else {
                gross_loss += trade.pnl.abs();
            }
        }

        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };
        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else {
            PROFIT_FACTOR_SENTINEL
        };

        let duration_ms = elapsed.as_secs_f64() * 1000.0;
        let bars_per_sec = if duration_ms > 0.0 {
            bars_processed as f64 / duration_ms * 1000.0
        } else {
            0.0
        };

        Self {
            final_equity,
            total_return_pct: (final_equity - initial_capital) / initial_capital * 100.0,
            total_trades,
            winning_trades,
            win_rate,
            gross_profit,
            gross_loss,
            profit_factor,
            duration_ms,
            bars_per_sec,
        }
    }
}
