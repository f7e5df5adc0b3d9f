//! Historical performance for a single security
//!
//! Prints trailing 1-year, 5-year and full-history returns plus the CAGR over
//! each window, from a local price-history CSV.
//!
//! Usage: trailing_returns --ticker AAPL --history-dir data/history

use anyhow::Context;
use clap::Parser;
use growth_projector::{
    history::{CsvHistorySource, HistorySource, WindowSpec},
    report::{format_currency, format_percent},
    estimate_cagr,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "trailing_returns", about = "Trailing returns from a price-history CSV")]
struct Args {
    /// Ticker symbol (reads <history-dir>/<TICKER>.csv)
    #[arg(long)]
    ticker: String,

    /// Directory containing price-history CSVs
    #[arg(long, default_value = "data/history")]
    history_dir: PathBuf,

    /// Windows to report
    #[arg(long, value_delimiter = ',', default_values_t = vec![WindowSpec::TrailingYears(1), WindowSpec::TrailingYears(5), WindowSpec::Max])]
    windows: Vec<WindowSpec>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let ticker = args.ticker.trim().to_ascii_uppercase();

    let source = CsvHistorySource::new(&args.history_dir);
    let history = source
        .full_history(&ticker)
        .with_context(|| format!("Failed to load history for {}", ticker))?;

    let (first, last) = match (history.first(), history.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => anyhow::bail!("No historical data available for {}", ticker),
    };

    println!("--- {} ---", ticker);
    println!("History:              {} to {} ({} observations)", first.date, last.date, history.len());
    println!("Last Close:           {}", format_currency(last.close));
    println!("\n--- Historical Performance ---");

    for spec in &args.windows {
        let window = history.window(*spec);
        let label = format!("{} Return:", spec);
        match history.trailing_return(*spec) {
            Ok(ret) => {
                let cagr = estimate_cagr(&window, window.span_years(), None)
                    .map(format_percent)
                    .unwrap_or_else(|_| "N/A".to_string());
                println!("{:<22}{} (CAGR {})", label, format_percent(ret), cagr);
            }
            Err(e) => println!("{:<22}N/A ({})", label, e),
        }
    }

    Ok(())
}
