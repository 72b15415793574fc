//! madtap - Passive credential and session observer for the merchant console.
//!
//! Main entry point for the madtap CLI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use madtap_core::capture::read_capture;
use madtap_core::replay::ReplayReport;
use madtap_core::session;
use madtap_core::{PageWatcher, Replayer, WatcherConfig};

/// madtap CLI.
#[derive(Parser)]
#[command(name = "madtap")]
#[command(about = "Passive credential and session observer for the merchant console")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded capture through the observer
    Replay {
        /// Path to a JSON Lines capture file
        capture: PathBuf,

        /// Fetch the private key once both credential halves are recovered
        #[arg(long)]
        fetch_keys: bool,

        /// API base for key acquisition (default: derived from the page URL)
        #[arg(long)]
        api_base: Option<String>,
    },

    /// Scan a single artifact for a session candidate
    Scan {
        #[command(subcommand)]
        source: ScanSource,
    },
}

#[derive(Subcommand)]
enum ScanSource {
    /// Scan a JSON response body for a delivery-strategy session candidate
    Body {
        /// Path to a JSON file
        file: PathBuf,
    },

    /// Scan an iframe address for an embedded session id
    Iframe {
        /// The iframe src attribute value
        address: String,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => WatcherConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WatcherConfig::default(),
    };

    match cli.command {
        Commands::Replay {
            capture,
            fetch_keys,
            api_base,
        } => run_replay(config, &capture, fetch_keys, api_base).await,
        Commands::Scan { source } => run_scan(source),
    }
}

/// Replay a capture file and report what the observer recovered.
async fn run_replay(
    mut config: WatcherConfig,
    capture: &Path,
    fetch_keys: bool,
    api_base: Option<String>,
) -> anyhow::Result<()> {
    config.fetch_keys = fetch_keys;
    if api_base.is_some() {
        config.api_base = api_base;
    }

    let events = read_capture(capture)
        .with_context(|| format!("reading capture {}", capture.display()))?;
    info!("Replaying {} events against {}", events.len(), config.page_url);

    let watcher = PageWatcher::new(&config)?;
    let report = Replayer::new(&watcher).run(&events).await;
    print_report(&report);

    Ok(())
}

fn print_report(report: &ReplayReport) {
    println!("Replay report");
    println!("{}", "=".repeat(50));
    println!("Calls observed:  {}", report.calls);
    println!(
        "Bearer token:    {}",
        report.bearer_token.as_deref().unwrap_or("-")
    );
    println!(
        "Site id:         {}",
        report.site_id.as_deref().unwrap_or("-")
    );
    println!(
        "Private key:     {}",
        report.private_key.as_deref().unwrap_or("-")
    );

    if !report.opened.is_empty() {
        println!("Sessions opened: {}", report.opened.join(", "));
    }
    if !report.closed.is_empty() {
        println!("Sessions closed: {}", report.closed.join(", "));
    }
}

/// Scan one artifact the way the observer would during live traffic.
fn run_scan(source: ScanSource) -> anyhow::Result<()> {
    let candidate = match source {
        ScanSource::Body { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let body: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", file.display()))?;
            session::strategy_candidate(&body)
        }
        ScanSource::Iframe { address } => session::iframe_candidate(&address),
    };

    match candidate {
        Some(id) => println!("Session candidate: {}", id),
        None => println!("No session candidate found."),
    }

    Ok(())
}
