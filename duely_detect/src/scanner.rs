//! One scan pass: events in, queued commitments out.

use chrono::Duration;
use duely_core::{
    Clock, Commitment, Event, EventSource, KnowledgeBase, KnowledgeError, SourceError,
    content_hash,
};
use duely_queue::{QueueError, QueueStore};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::builder::CommitmentBuilder;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to fetch events: {0}")]
    Source(#[from] SourceError),

    #[error("context lookup failed: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// What a scan pass did with its batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub events_seen: usize,
    /// Capture already queued as a commitment by an earlier pass.
    pub already_queued: usize,
    /// Same capture seen earlier in the batch.
    pub duplicates: usize,
    pub not_commitments: usize,
    /// Ids of the commitments appended, in order.
    pub created: Vec<String>,
}

fn commitment_hash(c: &Commitment) -> Option<String> {
    c.event_timestamp
        .map(|ts| content_hash(&c.source_app, &ts.to_rfc3339(), &c.raw_text))
}

/// Drives the detection pipeline over batches of events.
pub struct Scanner<K, C> {
    builder: CommitmentBuilder<K, C>,
}

impl<K: KnowledgeBase, C: Clock> Scanner<K, C> {
    #[must_use]
    pub const fn new(builder: CommitmentBuilder<K, C>) -> Self {
        Self { builder }
    }

    #[must_use]
    pub const fn builder(&self) -> &CommitmentBuilder<K, C> {
        &self.builder
    }

    /// Detect commitments in `events`, append them to `store` and save it.
    ///
    /// Events are recognised by content hash, not by timestamp, so a capture
    /// that reaches the source late is still scanned. Events that produced no
    /// commitment are simply classified again on the next pass.
    ///
    /// Nothing is appended unless every event was processed: a knowledge
    /// base failure leaves the store untouched.
    pub fn scan(&self, store: &mut QueueStore, events: &[Event]) -> Result<ScanReport, ScanError> {
        let mut report = ScanReport {
            events_seen: events.len(),
            ..ScanReport::default()
        };
        let queued: HashSet<String> = store
            .queue()
            .commitments
            .iter()
            .filter_map(commitment_hash)
            .collect();
        let mut batch = HashSet::new();

        // Ids are taken from a working copy so that every built commitment
        // sees the ones built before it.
        let mut working = store.queue().clone();
        let mut built = Vec::new();

        for event in events {
            let hash = event.content_hash();
            if queued.contains(&hash) {
                report.already_queued += 1;
                continue;
            }
            if !batch.insert(hash) {
                debug!("Skipping duplicate event from {}", event.source_app);
                report.duplicates += 1;
                continue;
            }
            match self.builder.build(event, &working)? {
                Some(commitment) => {
                    working.push(commitment.clone());
                    built.push(commitment);
                }
                None => report.not_commitments += 1,
            }
        }

        for commitment in built {
            report.created.push(commitment.id.clone());
            store.append(commitment)?;
        }
        store.mark_scanned(self.builder.clock().now());
        store.save()?;

        info!(
            "Scan complete: {} events, {} new commitments, {} already queued, {} duplicates",
            report.events_seen,
            report.created.len(),
            report.already_queued,
            report.duplicates
        );
        Ok(report)
    }

    /// Fetch events from `source` for the last `window` and scan them.
    pub async fn run<S>(
        &self,
        source: &S,
        window: Duration,
        store: &mut QueueStore,
    ) -> Result<ScanReport, ScanError>
    where
        S: EventSource + ?Sized,
    {
        let events = source.fetch_recent_events(window).await?;
        info!("Fetched {} events", events.len());
        self.scan(store, &events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use duely_core::{FixedClock, StaticKnowledgeBase};

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn scanner() -> Scanner<StaticKnowledgeBase, FixedClock> {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2026, 2, 4).expect("valid date"));
        Scanner::new(CommitmentBuilder::new(StaticKnowledgeBase::default(), clock))
    }

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn event(text: &str, minute: u32) -> Event {
        let at = Utc
            .with_ymd_and_hms(2026, 2, 4, 9, minute, 0)
            .single()
            .expect("valid timestamp");
        Event::new(text, "Slack", at)
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_scan_appends_and_saves() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("queue.json");
        let mut store = QueueStore::open(&path).expect("open");

        let report = scanner()
            .scan(
                &mut store,
                &[
                    event("Can you review this PR?", 0),
                    event("The standup is at 9am", 1),
                    event("I'll send that over tomorrow", 2),
                ],
            )
            .expect("scan");

        assert_eq!(report.events_seen, 3);
        assert_eq!(report.not_commitments, 1);
        assert_eq!(report.created, vec!["comm-20260204-001", "comm-20260204-002"]);
        assert!(!store.is_dirty());

        let saved = duely_queue::load_queue(&path);
        assert_eq!(saved.len(), 2);
        assert_eq!(saved.stats.total_detected, 2);
        assert!(saved.last_scan.is_some());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_duplicate_events_in_batch_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = QueueStore::open(dir.path().join("queue.json")).expect("open");

        let e = event("Can you review this PR?", 0);
        let report = scanner().scan(&mut store, &[e.clone(), e]).expect("scan");

        assert_eq!(report.duplicates, 1);
        assert_eq!(report.created.len(), 1);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_late_capture_before_previous_scan_is_still_detected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = QueueStore::open(dir.path().join("queue.json")).expect("open");
        let scanner = scanner();

        let first = event("Can you review this PR?", 0);
        scanner.scan(&mut store, &[first.clone()]).expect("first scan");
        let last_scan = store.queue().last_scan.expect("scan time recorded");

        let late = event("I'll send the deck tomorrow", 59);
        assert!(late.timestamp < last_scan);
        let report = scanner.scan(&mut store, &[first, late]).expect("second scan");

        assert_eq!(report.already_queued, 1);
        assert_eq!(report.created, vec!["comm-20260204-002"]);
        assert_eq!(store.queue().len(), 2);
    }
}
