use async_trait::async_trait;
use chrono::Duration;
use duely_core::{Clock, Event, EventSource, SourceError, SystemClock};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parse an events document: either one JSON array or one JSON object per
/// line. Blank lines are ignored. Errors carry the 1-based line number.
pub fn parse_events(content: &str) -> Result<Vec<Event>, SourceError> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(content).map_err(|e| SourceError::Parse {
            line: e.line(),
            source: e,
        });
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| SourceError::Parse {
                line: i + 1,
                source: e,
            })
        })
        .collect()
}

/// Events exported by a capture service to a local file.
#[derive(Debug, Clone)]
pub struct FileEventSource<C = SystemClock> {
    path: PathBuf,
    clock: C,
}

impl FileEventSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, SystemClock)
    }
}

impl<C: Clock> FileEventSource<C> {
    #[must_use]
    pub fn with_clock(path: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<C: Clock> EventSource for FileEventSource<C> {
    async fn fetch_recent_events(&self, window: Duration) -> Result<Vec<Event>, SourceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SourceError::Unavailable(format!(
                    "no events file at {}",
                    self.path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let now = self.clock.now();
        let since = now - window;
        let all = parse_events(&content)?;
        let total = all.len();

        let mut events: Vec<Event> = all
            .into_iter()
            .filter(|e| e.timestamp >= since && e.timestamp <= now)
            .collect();
        events.sort_by_key(|e| e.timestamp);

        debug!("{} of {} events fall inside the window", events.len(), total);
        info!("Read {} events from {}", events.len(), self.path.display());
        Ok(events)
    }
}
