use chrono::Utc;
use duely_config::Config;
use duely_core::Status;
use duely_queue::QueueStore;
use tracing::info;

/// Input parameters for the Resolve command strategy.
#[derive(Debug, Clone)]
pub struct ResolveInput {
    pub id: String,
    /// `pending` reopens a resolved commitment
    pub status: Status,
}

/// Strategy for recording a review decision on one commitment.
#[derive(Debug, Clone, Copy)]
pub struct ResolveStrategy;

impl super::CommandStrategy for ResolveStrategy {
    type Input = ResolveInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let mut store = QueueStore::open(config.queue_path())?;

        let previous = store.set_status(&input.id, input.status, Utc::now())?;
        store.close()?;

        info!("{}: {previous} -> {}", input.id, input.status);
        println!("{} is now {} (was {previous})", input.id, input.status);
        Ok(())
    }
}
