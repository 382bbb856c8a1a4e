//! Bar-by-bar engine loop.
//!
//! Per-bar step order is the correctness invariant and must not change:
//!
//! 1. Settle pending fills at this bar's open.
//! 2. Stop check on the open position (close submits, fills next bar).
//! 3. Update indicators and strategies with this bar.
//! 4. Dispatch the acting signal by regime.
//! 5. Entry (if flat, gated by risk) or signal-driven exit.
//! 6. Cooldown tick, equity mark, drawdown governor.
//!
//! Observations in steps 2–4 see bar t; actions taken in step 5 touch the
//! account no earlier than bar t+1.

pub mod report;

pub use report::RunReport;

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::{Bar, PositionSide, Regime, Signal, Trade};
use crate::execution::{ExecutionSim, OrderSide};
use crate::indicators::Atr;
use crate::risk::{RiskConfig, RiskGovernor};
use crate::strategy::{
    MeanReversionParams, MeanReversionStrategy, MomentumParams, MomentumStrategy, RegimeDetector,
    RegimeParams, Strategy,
};

/// Configuration for a single run. Defaults mirror the documented knob
/// defaults throughout.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Fraction of initial capital committed per entry.
    pub allocation_fraction: f64,
    /// Fee rate applied symmetrically on entry and exit notional.
    pub fee_rate: f64,
    /// Stop exits fill at the recorded stop price instead of the next open.
    pub fill_exits_at_stop: bool,
    /// Period of the ATR supplying stop distances at entry.
    pub atr_period: usize,
    pub risk: RiskConfig,
    pub regime: RegimeParams,
    pub momentum: MomentumParams,
    pub mean_reversion: MeanReversionParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            allocation_fraction: 0.20,
            fee_rate: 0.0,
            fill_exits_at_stop: false,
            atr_period: 14,
            risk: RiskConfig::default(),
            regime: RegimeParams::default(),
            momentum: MomentumParams::default(),
            mean_reversion: MeanReversionParams::default(),
        }
    }
}

/// Output of a run: the equity trajectory, the closed-trade ledger, and the
/// aggregate report.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Mark-to-market equity at each processed bar's close.
    pub equity_curve: Vec<f64>,
    pub trades: Vec<Trade>,
    pub report: RunReport,
    pub bars_processed: usize,
    /// Bars rejected by validation (logged, never simulated).
    pub bars_skipped: usize,
}

/// Run a backtest over an ordered bar sequence.
pub fn run_backtest(config: EngineConfig, bars: &[Bar]) -> RunResult {
    let start = Instant::now();
    let initial_capital = config.initial_capital;
    let mut engine = Engine::new(config);
    for bar in bars {
        engine.process_bar(bar);
    }

    let elapsed = start.elapsed();
    let final_equity = engine.equity_curve.last().copied().unwrap_or(initial_capital);
    let bars_processed = engine.bars_processed;
    let bars_skipped = engine.bars_skipped;
    let equity_curve = engine.equity_curve;
    let trades = engine.execution.into_trades();

    let report =
        RunReport::compute(&trades, final_equity, initial_capital, bars_processed, elapsed);
    info!(
        bars = bars_processed,
        skipped = bars_skipped,
        trades = trades.len(),
        final_equity,
        "run complete"
    );

    RunResult { equity_curve, trades, report, bars_processed, bars_skipped }
}

/// One simulation instance: owns every piece of per-run state.
pub struct Engine {
    config: EngineConfig,
    execution: ExecutionSim,
    risk: RiskGovernor,
    regime: RegimeDetector,
    momentum: MomentumStrategy,
    mean_reversion: MeanReversionStrategy,
    /// Supplies the stop distance at entry once warmed up.
    atr: Atr,
    last_timestamp: Option<i64>,
    peak_equity: f64,
    equity_curve: Vec<f64>,
    bars_processed: usize,
    bars_skipped: usize,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            execution: ExecutionSim::new(config.initial_capital, config.fee_rate),
            risk: RiskGovernor::new(config.risk),
            regime: RegimeDetector::new(config.regime),
            momentum: MomentumStrategy::new(config.momentum),
            mean_reversion: MeanReversionStrategy::new(config.mean_reversion),
            atr: Atr::new(config.atr_period),
            last_timestamp: None,
            peak_equity: config.initial_capital,
            equity_curve: Vec::new(),
            bars_processed: 0,
            bars_skipped: 0,
            config,
        }
    }

    /// Process one bar through the full pipeline.
    pub fn process_bar(&mut self, bar: &Bar) {
        // Data quality: impossible bars are skipped, out-of-order timestamps
        // are logged but still processed.
        if let Err(err) = bar.validate() {
            warn!(timestamp = bar.timestamp, %err, "skipping invalid bar");
            self.bars_skipped += 1;
            return;
        }
        if let Some(prev) = self.last_timestamp {
            if bar.timestamp <= prev {
                warn!(timestamp = bar.timestamp, prev, "non-monotone timestamp");
            }
        }
        self.last_timestamp = Some(bar.timestamp);

        // 1. Fills from the previous bar's decisions settle at this open.
        self.execution.settle_fills(bar);

        // 2. Stop check against this bar's range.
        if self.execution.is_invested() && self.risk.check_exit(bar) {
            if self.config.fill_exits_at_stop {
                self.execution.close_position_at(self.risk.stop_price());
            } else {
                self.execution.close_position();
            }
            self.risk.on_exit(false);
            debug!(timestamp = bar.timestamp, stop = self.risk.stop_price(), "stop hit");
        }

        // 3. Indicators and strategies observe the completed bar.
        self.atr.update(bar);
        self.regime.on_bar(bar);
        self.momentum.on_bar(bar);
        self.mean_reversion.on_bar(bar);

        // 4. The regime selects which producer's signal the engine acts on.
        let signal = match self.regime.regime() {
            Regime::LvTrend | Regime::HvTrend => self.momentum.signal(),
            Regime::LvRange => self.mean_reversion.signal(),
            Regime::HvRange | Regime::Undefined => Signal::Flat,
        };

        // 5. Act. Orders queued here fill at the next bar's open.
        if signal != Signal::Flat && !self.execution.is_invested() {
            if self.risk.can_enter(bar.timestamp) && bar.close > 0.0 {
                let quantity =
                    self.config.allocation_fraction * self.config.initial_capital / bar.close;
                let atr_estimate = if self.atr.is_ready() {
                    self.atr.value()
                } else {
                    // Warmup fallback until the real ATR is available.
                    0.01 * bar.close
                };
                let (order_side, position_side) = match signal {
                    Signal::Long => (OrderSide::Buy, PositionSide::Long),
                    Signal::Short => (OrderSide::Sell, PositionSide::Short),
                    Signal::Flat => unreachable!(),
                };
                self.execution.submit(order_side, quantity);
                self.risk.on_entry(bar.close, atr_estimate, position_side, bar.timestamp);
                debug!(timestamp = bar.timestamp, ?signal, quantity, "entry submitted");
            }
        } else if signal == Signal::Flat
            && self.execution.is_invested()
            && !self.execution.has_pending_order()
        {
            self.execution.close_position();
            self.risk.on_exit(true);
            debug!(timestamp = bar.timestamp, "signal exit submitted");
        }

        // 6. Cooldown tick, equity mark, drawdown governor.
        self.risk.tick();

        let equity = self.execution.equity(bar.close);
        self.equity_curve.push(equity);
        self.bars_processed += 1;

        if equity > self.peak_equity {
            self.peak_equity = equity;
        } else if self.config.risk.max_drawdown_limit > 0.0
            && self.execution.is_invested()
            && !self.execution.has_pending_order()
        {
            let drawdown = (self.peak_equity - equity) / self.peak_equity;
            if drawdown > self.config.risk.max_drawdown_limit {
                warn!(
                    timestamp = bar.timestamp,
                    drawdown, "max drawdown breached, forcing flat"
                );
                self.execution.close_position();
                self.risk.on_exit(false);
            }
        }
    }

    pub fn equity_curve(&self) -> &[f64] {
        &self.equity_curve
    }

    pub fn regime(&self) -> Regime {
        self.regime.regime()
    }
}
