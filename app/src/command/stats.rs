use duely_config::Config;
use duely_queue::load_queue;

/// Strategy for printing queue statistics.
#[derive(Debug, Clone, Copy)]
pub struct StatsStrategy;

impl super::CommandStrategy for StatsStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let queue = load_queue(&config.queue_path());
        let stats = &queue.stats;

        println!("=== Commitment Queue ===\n");
        println!("Total Detected: {}", stats.total_detected);
        println!("  Inbound: {}", stats.inbound);
        println!("  Outbound: {}", stats.outbound);
        println!();
        println!("Pending: {}", queue.pending().count());
        println!("Completed: {}", stats.completed);
        println!("Dismissed: {}", stats.dismissed);
        println!();
        match queue.last_scan {
            Some(at) => println!("Last Scan: {}", at.to_rfc3339()),
            None => println!("Last Scan: (never)"),
        }
        Ok(())
    }
}
