use duely_config::Config;
use duely_core::KnowledgeBase;
use duely_queue::{load_queue, lock_path};
use duely_sources::VaultKnowledgeBase;
use std::path::Path;

/// Strategy for displaying configuration information.
///
/// Prints where the queue, events and vault live, checks that each one is
/// reachable, and shows the application lists used for person resolution.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

fn presence(path: &Path) -> &'static str {
    if path.exists() { "found" } else { "missing" }
}

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== duely Configuration ===\n");

        match Config::config_path() {
            Ok(path) => println!("Config File: {} ({})", path.display(), presence(&path)),
            Err(e) => println!("Config File: unavailable ({e})"),
        }
        println!();

        let queue_path = config.queue_path();
        println!("Queue:");
        println!("  Path: {} ({})", queue_path.display(), presence(&queue_path));
        println!("  Lock: {}", lock_path(&queue_path).display());
        println!("  Commitments: {}", load_queue(&queue_path).len());
        println!();

        println!("Scan:");
        match config.events_path() {
            Some(path) => println!("  Events: {} ({})", path.display(), presence(&path)),
            None => println!("  Events: (not set)"),
        }
        println!("  Window: {} minutes", config.scan.window_minutes);
        println!();

        println!("Vault:");
        match config.vault_root() {
            Some(root) => {
                println!("  Root: {}", root.display());
                let vault = VaultKnowledgeBase::new(
                    root,
                    config.vault.people_dir.clone(),
                    config.vault.projects_dir.clone(),
                );
                match (vault.list_people_pages(), vault.list_projects()) {
                    (Ok(people), Ok(projects)) => {
                        println!("  People: {} pages in {}", people.len(), config.vault.people_dir);
                        println!(
                            "  Projects: {} pages in {}",
                            projects.len(),
                            config.vault.projects_dir
                        );
                    }
                    (Err(e), _) | (_, Err(e)) => println!("  Status: {e}"),
                }
            }
            None => println!("  Root: (not set, context matching disabled)"),
        }
        println!();

        println!("Apps:");
        println!("  Chat: {}", config.apps.chat.join(", "));
        println!("  Email: {}", config.apps.email.join(", "));
        println!();

        println!("Patterns:");
        let library = config.pattern_library()?;
        let source = if config.patterns.is_some() { "config" } else { "built-in" };
        println!("  Source: {source}");
        println!("  Inbound Rules: {}", library.inbound().len());
        println!("  Outbound Rules: {}", library.outbound().len());
        println!("  Deadline Rules: {}", library.deadline().len());
        println!("  Person Rules: {}", library.person().len());

        Ok(())
    }
}
