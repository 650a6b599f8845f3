use async_trait::async_trait;
use chrono::Duration;

use crate::{Event, SourceError};

/// Upstream capture service that supplies raw text with timestamps.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Events captured within `window` of now, oldest first.
    async fn fetch_recent_events(&self, window: Duration) -> Result<Vec<Event>, SourceError>;
}
