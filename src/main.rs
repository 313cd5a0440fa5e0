use anyhow::{Context, Result};
use api_client::{QuoteClient, YahooClient};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use configuration::{Config, LoggingConfig, WindowFailurePolicy};
use engine::ReportEngine;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod output;

/// The main entry point for the asset report application.
#[tokio::main]
async fn main() -> Result<()> {
    // `.env` is optional; it only feeds ASSET_REPORT__* overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Summary(args) => handle_summary(args, &config).await,
        Commands::Resolve(args) => handle_resolve(args, &config).await,
        Commands::History(args) => handle_history(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Volatility, max drawdown and performance of an instrument over trailing windows.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize one or more instruments over the 3 years, 1 year, 3 months and this year windows.
    Summary(SummaryArgs),
    /// Resolve an ISIN to its ticker symbol.
    Resolve(ResolveArgs),
    /// Print the daily bars of a symbol.
    History(HistoryArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
struct SummaryArgs {
    /// The ISINs to report on (e.g., "US0378331005").
    #[arg(required = true)]
    identifiers: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Anchor the windows on this date instead of today (format: YYYY-MM-DD).
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Overrides `report.on_window_error` from the configuration.
    #[arg(long, value_enum)]
    on_window_error: Option<WindowFailurePolicy>,
}

#[derive(Parser)]
struct ResolveArgs {
    /// The ISIN to look up.
    identifier: String,
}

#[derive(Parser)]
struct HistoryArgs {
    /// The ticker symbol (e.g., "AAPL").
    symbol: String,

    /// The first day to fetch (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// The last day to fetch (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Builds every requested report concurrently and prints them in argument order.
async fn handle_summary(args: SummaryArgs, config: &Config) -> Result<()> {
    let mut report_config = config.report.clone();
    if let Some(policy) = args.on_window_error {
        report_config.on_window_error = policy;
    }

    let client = Arc::new(YahooClient::new(&config.api).context("Failed to create the quote client")?);
    let report_engine = ReportEngine::new(client, report_config);
    let today = args.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let spinner = (args.format == OutputFormat::Table)
        .then(|| spinner(format!("Fetching {} report(s)...", args.identifiers.len())));

    let results = join_all(
        args.identifiers
            .iter()
            .map(|identifier| report_engine.summarize_asset_as_of(identifier, today)),
    )
    .await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = 0usize;
    for (identifier, result) in args.identifiers.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                failures += 1;
                tracing::error!(identifier = identifier.as_str(), error = %e, "Report failed.");
                eprintln!("Error for {}: {}", identifier, e);
            }
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Table => {
            for report in &reports {
                println!("{}\n", output::report_table(report));
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} report(s) failed", failures, args.identifiers.len());
    }
    Ok(())
}

async fn handle_resolve(args: ResolveArgs, config: &Config) -> Result<()> {
    let client = YahooClient::new(&config.api).context("Failed to create the quote client")?;
    let symbol = client.resolve_symbol(&args.identifier).await?;
    println!("{}", symbol);
    Ok(())
}

async fn handle_history(args: HistoryArgs, config: &Config) -> Result<()> {
    let client = YahooClient::new(&config.api).context("Failed to create the quote client")?;
    let to = args.to.unwrap_or_else(|| Utc::now().date_naive());

    let spinner = (args.format == OutputFormat::Table)
        .then(|| spinner(format!("Fetching {} from {} to {}...", args.symbol, args.from, to)));
    let series = client.fetch_series(&args.symbol, args.from, to).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let series = series?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&series)?),
        OutputFormat::Table => println!("{}", output::series_table(&series)),
    }
    Ok(())
}

// ==============================================================================
// Ambient Setup
// ==============================================================================

/// Installs the global subscriber: stderr always, plus daily-rolling files when
/// `logging.directory` is set. `RUST_LOG` takes precedence over `logging.level`.
fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid log level `{}`", logging.level))?,
    };

    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "asset-report.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
