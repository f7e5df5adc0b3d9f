//! Growth Projector CLI
//!
//! Projects a portfolio from a holdings CSV and a directory of price-history CSVs.
//!
//! Usage: growth_projector --holdings holdings.csv --history-dir data/history --years 10

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::Parser;
use growth_projector::{
    assumptions::{validate_max_cagr, Assumptions},
    history::CsvHistorySource,
    holdings::{load_holdings, RejectedRow},
    projection::{PortfolioProjection, PortfolioSummary, ProjectionConfig, ProjectionEngine, ProjectionRecord},
    report::{format_currency, format_percent},
    ElapsedConvention,
};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "growth_projector", version, about = "Project portfolio growth from historical CAGR")]
struct Args {
    /// Holdings CSV with TICKER and SHARES or AMOUNT columns
    #[arg(long)]
    holdings: PathBuf,

    /// Directory containing one <TICKER>.csv price history per security
    #[arg(long, default_value = "data/history")]
    history_dir: PathBuf,

    /// Holding period in whole years
    #[arg(long, default_value_t = 10)]
    years: u32,

    /// Annual inflation rate (0.025 = 2.5%)
    #[arg(long, default_value_t = 0.025)]
    inflation: f64,

    /// Cap on the estimated growth rate (overrides assumptions)
    #[arg(long, conflicts_with = "no_cap")]
    cap: Option<f64>,

    /// Disable the growth-rate cap
    #[arg(long)]
    no_cap: bool,

    /// Use calendar span instead of trading-day count for elapsed time
    #[arg(long)]
    calendar_elapsed: bool,

    /// Directory with window_policy.csv and growth.csv (built-in defaults if omitted)
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Date security ages are measured to (YYYY-MM-DD, default today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Write yearly values per security and in total to this CSV
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the full result as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct SkippedOutput {
    ticker: String,
    reason: String,
}

#[derive(Serialize)]
struct ProjectionResponse<'a> {
    holding_period_years: u32,
    inflation_rate: f64,
    records: &'a [ProjectionRecord],
    skipped: Vec<SkippedOutput>,
    rejected_rows: &'a [RejectedRow],
    summary: &'a PortfolioSummary,
}

fn load_assumptions(args: &Args) -> anyhow::Result<Assumptions> {
    let mut assumptions = match &args.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("Failed to load assumptions from {}", dir.display()))?,
        None => Assumptions::default_growth(),
    };

    if args.no_cap {
        assumptions.growth.max_cagr = None;
    } else if let Some(cap) = args.cap {
        assumptions.growth.max_cagr = Some(validate_max_cagr(cap).context("Invalid --cap")?);
    }
    if args.calendar_elapsed {
        assumptions.growth.elapsed = ElapsedConvention::CalendarSpan;
    }

    Ok(assumptions)
}

fn write_yearly_csv(path: &Path, projection: &PortfolioProjection) -> anyhow::Result<()> {
    let mut file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;

    let tickers: Vec<&str> = projection.records.iter().map(|r| r.ticker.as_str()).collect();
    writeln!(file, "Year,{},Total", tickers.join(","))?;

    for (year, total) in projection.summary.total_yearly_points() {
        let values: Vec<String> = projection
            .records
            .iter()
            .map(|r| format!("{:.2}", r.yearly_values[year as usize]))
            .collect();
        writeln!(file, "{},{},{:.2}", year, values.join(","), total)?;
    }

    Ok(())
}

fn print_report(projection: &PortfolioProjection, rejected: &[RejectedRow]) {
    let summary = &projection.summary;

    println!("{}", "=".repeat(60));
    println!("Projections over {} years", summary.holding_period_years);
    println!("{}", "=".repeat(60));

    for record in &projection.records {
        println!("\n{} ({:.1} years of history, {} window)", record.ticker, record.security_age_years, record.window);
        if record.growth.capped {
            println!(
                "  Calculated CAGR: {} (capped at {})",
                format_percent(record.growth.raw_rate),
                format_percent(record.growth.rate)
            );
        } else {
            println!(
                "  Historical CAGR ({:.1} years): {}",
                record.growth.elapsed_years,
                format_percent(record.growth.rate)
            );
        }
        println!("  Initial Investment: {}", format_currency(record.initial_amount));
        println!("  Projected Value (nominal): {}", format_currency(record.nominal_final));
        println!("  Projected Value (inflation-adjusted): {}", format_currency(record.real_final));
    }

    if !projection.skipped.is_empty() || !rejected.is_empty() {
        println!("\nSkipped:");
        for row in rejected {
            println!("  {} (line {}): {}", row.ticker, row.line, row.reason);
        }
        for skip in &projection.skipped {
            println!("  {}: {}", skip.ticker, skip.error);
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("PORTFOLIO SUMMARY");
    println!("{}", "=".repeat(60));
    println!("\nTotal Initial Investment: {}", format_currency(summary.total_initial));
    println!("Total Projected Value (nominal): {}", format_currency(summary.total_nominal));
    println!("Total Projected Value (inflation-adjusted): {}", format_currency(summary.total_real));
    println!(
        "Total Nominal Gain: {} ({})",
        format_currency(summary.nominal_gain),
        format_percent(summary.nominal_gain_pct)
    );
    println!(
        "Total Real Gain: {} ({})",
        format_currency(summary.real_gain),
        format_percent(summary.real_gain_pct)
    );
    println!("\nPortfolio CAGR: {}", format_percent(summary.portfolio_cagr));
    println!("Average Stock CAGR: {}", format_percent(summary.average_stock_cagr));
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.years == 0 {
        bail!("Holding period must be greater than 0");
    }

    let assumptions = load_assumptions(&args)?;
    let source = CsvHistorySource::new(&args.history_dir);

    let loaded = load_holdings(&args.holdings, &source)
        .with_context(|| format!("Failed to import holdings from {}", args.holdings.display()))?;

    let config = ProjectionConfig {
        holding_period_years: args.years,
        inflation_rate: args.inflation,
        as_of: Some(args.as_of.unwrap_or_else(|| Local::now().date_naive())),
    };

    let engine = ProjectionEngine::new(assumptions, config);
    let projection = engine
        .project(&loaded.requests, &source)
        .context("No valid stock data could be projected")?;

    if let Some(path) = &args.output {
        write_yearly_csv(path, &projection)?;
    }

    if args.json {
        let response = ProjectionResponse {
            holding_period_years: args.years,
            inflation_rate: args.inflation,
            records: &projection.records,
            skipped: projection
                .skipped
                .iter()
                .map(|s| SkippedOutput {
                    ticker: s.ticker.clone(),
                    reason: s.error.to_string(),
                })
                .collect(),
            rejected_rows: &loaded.rejected,
            summary: &projection.summary,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_report(&projection, &loaded.rejected);
        if let Some(path) = &args.output {
            println!("\nYearly values written to: {}", path.display());
        }
    }

    Ok(())
}
