use broker_client::{BrokerApi, InvestRestClient};
use chrono::{NaiveTime, Utc};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use refdata_client::{IssRefdataClient, ReferenceData};
use report_sink::{ConsoleSink, ReportSink, SpreadsheetSink};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;
use yield_engine::{RejectReason, ScreeningOutcome, YieldEngine, YieldReport};

/// The main entry point for the bondscreen application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the API tokens from a local .env file, if one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Screen(args) => handle_screen(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Ranks exchange-traded bonds by realized post-tax yield and publishes
/// the ranking to a spreadsheet.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the bond universe, rank it, and publish the result.
    Screen(ScreenArgs),
}

#[derive(Parser)]
struct ScreenArgs {
    /// Render the ranking to the console instead of the spreadsheet.
    #[arg(long)]
    dry_run: bool,

    /// Only screen the first N instruments (useful for smoke runs).
    #[arg(long)]
    limit: Option<usize>,
}

// ==============================================================================
// Screen Command Logic
// ==============================================================================

/// Handles the orchestration of one screening run.
async fn handle_screen(args: ScreenArgs) -> anyhow::Result<()> {
    let settings = configuration::load_config()?;

    let broker = InvestRestClient::new(&settings.broker)?;
    let refdata = IssRefdataClient::new(&settings.refdata)?;
    let engine = YieldEngine::new(settings.screening.clone());

    let sink: Box<dyn ReportSink> = if args.dry_run {
        Box::new(ConsoleSink::new())
    } else {
        Box::new(SpreadsheetSink::new(&settings.sheet)?)
    };

    tracing::info!("fetching the bond universe");
    let mut bonds = broker.list_bonds().await?;
    if let Some(limit) = args.limit {
        bonds.truncate(limit);
    }
    tracing::info!(count = bonds.len(), "screening instruments");

    // Set up the progress bar
    let progress_bar = ProgressBar::new(bonds.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let now = Utc::now();
    let mut accepted: Vec<YieldReport> = Vec::new();
    let mut rejections: HashMap<RejectReason, usize> = HashMap::new();

    // Strictly sequential: one bond, its three lookups, then the next.
    // A failed broker call aborts the whole run; a bad instrument does not.
    for bond in &bonds {
        progress_bar.inc(1);
        progress_bar.set_message(bond.ticker.clone());

        // Instruments that can never be ranked skip their market-data fetches.
        if let Some(reason) = engine.pre_reject(bond) {
            tracing::debug!(ticker = %bond.ticker, %reason, "excluded");
            *rejections.entry(reason).or_insert(0) += 1;
            continue;
        }

        let quote = broker.last_price(&bond.uid).await?;
        let offer_date = refdata.offer_date(&bond.ticker).await;

        // Coupons are only relevant up to the payoff horizon.
        let horizon = offer_date
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            .unwrap_or(bond.maturity_date);
        let coupons = broker.coupon_events(&bond.uid, now, horizon).await?;

        match engine.evaluate(bond, &quote, &coupons, offer_date, now)? {
            ScreeningOutcome::Accepted(report) => accepted.push(report),
            ScreeningOutcome::Rejected(reason) => {
                tracing::debug!(ticker = %bond.ticker, %reason, "excluded");
                *rejections.entry(reason).or_insert(0) += 1;
            }
        }
    }

    progress_bar.finish_with_message("screening complete");

    for (reason, count) in &rejections {
        tracing::info!(%reason, count, "excluded");
    }
    tracing::info!(accepted = accepted.len(), "publishing ranking");

    sink.publish(&accepted).await?;

    Ok(())
}
