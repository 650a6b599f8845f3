#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use duely_core::Status;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CommandStrategy, InfoStrategy, InitStrategy, ListInput, ListStrategy, ResolveInput,
    ResolveStrategy, ScanInput, ScanStrategy, StatsStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "duely")]
#[command(about = "Find the promises and asks hiding in your messages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Scan recent events for commitments
    Scan {
        /// Events file (JSON array or JSON lines); overrides scan.events_path
        #[arg(short = 'e', long)]
        events: Option<PathBuf>,

        /// How far back to look, in minutes; overrides scan.window_minutes
        #[arg(short = 'w', long)]
        window: Option<u32>,
    },
    /// List queued commitments
    List {
        /// Only show commitments with this status (default: pending)
        #[arg(short = 's', long)]
        status: Option<Status>,

        /// Show every commitment regardless of status
        #[arg(short = 'a', long, conflicts_with = "status")]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Mark a commitment as completed or dismissed
    Resolve {
        /// Commitment id, e.g. comm-20260204-001
        id: String,

        /// New status
        #[arg(short = 's', long, default_value = "completed")]
        status: Status,
    },
    /// Show queue statistics
    Stats,
    /// Show configuration
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Scan { events, window } => {
            ScanStrategy
                .execute(ScanInput { events, window })
                .await
        }
        Commands::List { status, all, json } => {
            let filter = if all {
                None
            } else {
                Some(status.unwrap_or_default())
            };
            ListStrategy
                .execute(ListInput {
                    status: filter,
                    json,
                })
                .await
        }
        Commands::Resolve { id, status } => {
            ResolveStrategy
                .execute(ResolveInput { id, status })
                .await
        }
        Commands::Stats => StatsStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
