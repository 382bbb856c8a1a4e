//! regimelab CLI — load a CSV of bars, run the backtest, print the report.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use regimelab_core::engine::{run_backtest, RunResult};
use regimelab_runner::config::BacktestConfig;
use regimelab_runner::{data_loader, telemetry};

#[derive(Parser, Debug)]
#[command(name = "regimelab", about = "Regime-switching backtest engine")]
struct Cli {
    /// Path to an OHLCV CSV (timestamp,open,high,low,close,volume)
    data: PathBuf,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Default log level (RUST_LOG overrides)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging(&cli.log_level)?;

    let config = match &cli.config {
        Some(path) => BacktestConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => BacktestConfig::default(),
    };

    let loaded = data_loader::load_csv(&cli.data)
        .with_context(|| format!("loading bars from {}", cli.data.display()))?;
    if loaded.bars.is_empty() {
        info!("no bars loaded; nothing to simulate");
    }

    let result = run_backtest(config.to_engine_config(), &loaded.bars);
    print_report(&result);

    Ok(())
}

fn print_report(result: &RunResult) {
    let report = &result.report;
    println!(
        "\nProcessed {} bars in {:.2} ms ({:.0} bars/sec), {} skipped",
        result.bars_processed, report.duration_ms, report.bars_per_sec, result.bars_skipped
    );
    println!("==========================================");
    println!("           PERFORMANCE REPORT             ");
    println!("==========================================");
    println!("Final Equity:   {:.2}", report.final_equity);
    println!("Total Return:   {:.2}%", report.total_return_pct);
    println!("------------------------------------------");
    println!("Total Trades:   {}", report.total_trades);
    println!("Win Rate:       {:.2}%", report.win_rate);
    println!("Profit Factor:  {:.2}", report.profit_factor);
    println!("Gross Profit:   {:.2}", report.gross_profit);
    println!("Gross Loss:     {:.2}", -report.gross_loss);
    println!("==========================================");
}
