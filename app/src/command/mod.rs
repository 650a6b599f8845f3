//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is a separate strategy type with its own input type, so
//! dispatch in `main` is resolved at compile time.

use duely_core::Commitment;

mod info;
mod init;
mod list;
mod resolve;
mod scan;
mod stats;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use list::{ListInput, ListStrategy};
pub use resolve::{ResolveInput, ResolveStrategy};
pub use scan::{ScanInput, ScanStrategy};
pub use stats::StatsStrategy;
pub use version::VersionStrategy;

/// Contract shared by every command strategy.
///
/// Each strategy names its own input type, so parameters are passed
/// without boxing or runtime casting.
pub trait CommandStrategy: Send + Sync + 'static {
    type Input;

    /// Run the command.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Shorten `s` to at most `max_chars` characters on one line.
fn truncate(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let kept: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// One table row for a commitment.
fn summary_line(c: &Commitment) -> String {
    let due = c
        .deadline
        .map_or_else(|| "-".to_string(), |d| d.date.to_string());
    format!(
        "{:<18} {:<8} {:<10} {:<9} {:<16} {}",
        c.id,
        c.kind.as_str(),
        due,
        c.status.as_str(),
        truncate(c.person.as_deref().unwrap_or("-"), 16),
        truncate(&c.raw_text, 60)
    )
}
