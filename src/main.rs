use analytics::SeriesAnalytics;
use anyhow::Context;
use api_client::YahooClient;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::{load_config, load_request};
use futures::future::join_all;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the betafolio analytics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // All collaborators are constructed here and passed down explicitly;
    // nothing below main holds shared global state.
    let config = load_config().context("Failed to load configuration")?;
    let client = YahooClient::new(&config.provider);

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary(args) => handle_summary(args, &client).await?,
        Commands::Beta(args) => handle_beta(args, &client).await?,
        Commands::Portfolio(args) => handle_portfolio(args, &client).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Descriptive and risk-adjusted statistics for financial price series.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statistics snapshot for one symbol.
    Summary(SummaryArgs),
    /// Regress one symbol's returns against a benchmark.
    Beta(BetaArgs),
    /// Analyze every holding of a portfolio request against its benchmark.
    Portfolio(PortfolioArgs),
}

#[derive(Parser)]
struct SummaryArgs {
    /// The symbol to analyze (e.g., "AAPL").
    #[arg(long)]
    symbol: String,

    /// The start of the analysis window (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,
}

#[derive(Parser)]
struct BetaArgs {
    /// The dependent symbol (e.g., "AAPL").
    #[arg(long)]
    symbol: String,

    /// The benchmark symbol to regress against (e.g., "SPY").
    #[arg(long)]
    benchmark: String,

    /// The start of the analysis window (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,
}

#[derive(Parser)]
struct PortfolioArgs {
    /// Path to a TOML portfolio request (holdings, benchmark, start_date).
    #[arg(long)]
    request: PathBuf,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_summary(args: SummaryArgs, client: &YahooClient) -> anyhow::Result<()> {
    let series = SeriesAnalytics::fetch(&args.symbol, args.from, client)
        .await
        .with_context(|| format!("Failed to fetch '{}'", args.symbol))?;

    let report = series.summary()?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

async fn handle_beta(args: BetaArgs, client: &YahooClient) -> anyhow::Result<()> {
    let (series, benchmark) = tokio::try_join!(
        SeriesAnalytics::fetch(&args.symbol, args.from, client),
        SeriesAnalytics::fetch(&args.benchmark, args.from, client),
    )?;

    let beta = series.beta(&benchmark)?;
    println!(
        "{} beta vs {}: {beta}",
        series.symbol(),
        benchmark.symbol()
    );

    Ok(())
}

/// Handles the orchestration of a full portfolio analysis.
async fn handle_portfolio(args: PortfolioArgs, client: &YahooClient) -> anyhow::Result<()> {
    let request = load_request(&args.request)
        .with_context(|| format!("Invalid portfolio request '{}'", args.request.display()))?;

    let benchmark = SeriesAnalytics::fetch(&request.benchmark, request.start_date, client)
        .await
        .with_context(|| format!("Failed to fetch benchmark '{}'", request.benchmark))?;

    // Fetch every holding concurrently; each instance is independent.
    let fetches = request
        .holdings
        .iter()
        .map(|symbol| SeriesAnalytics::fetch(symbol, request.start_date, client));
    let holdings = join_all(fetches).await;

    // A degenerate statistic for one holding should not abort the rest of
    // the portfolio, so per-symbol failures are reported and skipped.
    for (symbol, fetched) in request.holdings.iter().zip(holdings) {
        let series = match fetched {
            Ok(series) => series,
            Err(e) => {
                eprintln!("Error fetching {symbol}: {e}");
                continue;
            }
        };
        match portfolio_entry(&series, &benchmark) {
            Ok(entry) => println!("{entry}"),
            Err(e) => eprintln!("Error analyzing {symbol}: {e}"),
        }
    }

    Ok(())
}

fn portfolio_entry(
    series: &SeriesAnalytics,
    benchmark: &SeriesAnalytics,
) -> anyhow::Result<String> {
    let report = series.summary()?;
    let beta = series.beta(benchmark)?;

    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "summary": report,
        "beta": beta,
    }))?)
}
