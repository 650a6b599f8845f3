use duely_config::Config;
use duely_core::{Commitment, Status};
use duely_queue::load_queue;

/// Input parameters for the List command strategy.
#[derive(Debug, Clone)]
pub struct ListInput {
    /// Only commitments in this state; `None` lists everything
    pub status: Option<Status>,
    pub json: bool,
}

/// Strategy for listing queued commitments in detection order.
///
/// Reads the queue without taking its lock, so it works while a scan runs.
#[derive(Debug, Clone, Copy)]
pub struct ListStrategy;

impl super::CommandStrategy for ListStrategy {
    type Input = ListInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let queue = load_queue(&config.queue_path());

        let selected: Vec<&Commitment> = match input.status {
            Some(status) => queue.with_status(status).collect(),
            None => queue.commitments.iter().collect(),
        };

        if input.json {
            println!("{}", serde_json::to_string_pretty(&selected)?);
            return Ok(());
        }

        if selected.is_empty() {
            match input.status {
                Some(status) => println!("No {status} commitments."),
                None => println!("The queue is empty."),
            }
            return Ok(());
        }

        for c in &selected {
            println!("{}", super::summary_line(c));
        }
        println!("\n{} of {} commitments", selected.len(), queue.len());
        Ok(())
    }
}
