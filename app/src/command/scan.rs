//! Scan command: fetch recent events, detect commitments, queue them.

use chrono::Duration;
use duely_config::Config;
use duely_core::{KnowledgeBase, StaticKnowledgeBase, SystemClock};
use duely_detect::{CommitmentBuilder, Scanner};
use duely_queue::QueueStore;
use duely_sources::{FileEventSource, VaultKnowledgeBase};
use std::path::PathBuf;
use tracing::info;

/// Input parameters for the Scan command strategy.
#[derive(Debug, Clone)]
pub struct ScanInput {
    /// Events file, overriding the configured one
    pub events: Option<PathBuf>,
    /// Look-back window in minutes, overriding the configured one
    pub window: Option<u32>,
}

/// Strategy for running one scan pass.
///
/// Holds the queue lock for the whole pass, so a second scan started
/// meanwhile fails instead of racing this one.
#[derive(Debug, Clone, Copy)]
pub struct ScanStrategy;

fn knowledge_base(config: &Config) -> Box<dyn KnowledgeBase> {
    match config.vault_root() {
        Some(root) => {
            info!("Matching context against vault {}", root.display());
            Box::new(VaultKnowledgeBase::new(
                root,
                config.vault.people_dir.clone(),
                config.vault.projects_dir.clone(),
            ))
        }
        None => {
            info!("No vault configured, context matching disabled");
            Box::new(StaticKnowledgeBase::default())
        }
    }
}

impl super::CommandStrategy for ScanStrategy {
    type Input = ScanInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        let Some(events_path) = input.events.or_else(|| config.events_path()) else {
            anyhow::bail!(
                "No events file given. Pass --events or set scan.events_path in the config."
            );
        };
        let window = input.window.unwrap_or(config.scan.window_minutes);

        let builder = CommitmentBuilder::new(knowledge_base(&config), SystemClock)
            .with_library(config.pattern_library()?)
            .with_apps(config.apps.clone());
        let scanner = Scanner::new(builder);

        let mut store = QueueStore::open(config.queue_path())?;
        let source = FileEventSource::new(&events_path);
        let report = scanner
            .run(&source, Duration::minutes(i64::from(window)), &mut store)
            .await?;

        println!(
            "Scanned {} events from {} (last {window} min)",
            report.events_seen,
            events_path.display()
        );
        if report.already_queued > 0 || report.duplicates > 0 {
            println!(
                "  skipped: {} already queued, {} duplicates",
                report.already_queued, report.duplicates
            );
        }
        if report.created.is_empty() {
            println!("No new commitments.");
        } else {
            println!("New commitments:");
            for id in &report.created {
                if let Some(c) = store.queue().get(id) {
                    println!("  {}", super::summary_line(c));
                }
            }
        }
        Ok(())
    }
}
