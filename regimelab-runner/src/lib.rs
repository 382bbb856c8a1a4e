//! Runner crate: the external collaborators the core engine consumes.
//!
//! CSV bar loading, TOML configuration, and logging setup. The `regimelab`
//! binary ties them together into a command-line backtest runner.

pub mod config;
pub mod data_loader;
pub mod telemetry;
