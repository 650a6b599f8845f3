//! The persisted commitment queue document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Commitment, CommitmentType, Status};

/// Summary counters kept alongside the commitments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    #[serde(default)]
    pub total_detected: u64,
    #[serde(default)]
    pub inbound: u64,
    #[serde(default)]
    pub outbound: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub dismissed: u64,
}

impl QueueStats {
    fn record_detected(&mut self, kind: CommitmentType) {
        self.total_detected += 1;
        match kind {
            CommitmentType::Inbound => self.inbound += 1,
            CommitmentType::Outbound => self.outbound += 1,
        }
    }

    fn record_transition(&mut self, from: Status, to: Status) {
        match from {
            Status::Completed => self.completed = self.completed.saturating_sub(1),
            Status::Dismissed => self.dismissed = self.dismissed.saturating_sub(1),
            Status::Pending => {}
        }
        match to {
            Status::Completed => self.completed += 1,
            Status::Dismissed => self.dismissed += 1,
            Status::Pending => {}
        }
    }
}

/// Append-only collection of detected commitments.
///
/// Insertion order is detection order and is never rearranged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    #[serde(default = "Queue::current_version")]
    pub version: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::time_format::option"
    )]
    pub last_scan: Option<DateTime<Utc>>,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
    #[serde(default)]
    pub stats: QueueStats,
}

impl Default for Queue {
    fn default() -> Self {
        Self {
            version: Self::current_version(),
            last_scan: None,
            commitments: Vec::new(),
            stats: QueueStats::default(),
        }
    }
}

impl Queue {
    pub const VERSION: u32 = 1;

    const fn current_version() -> u32 {
        Self::VERSION
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty()
    }

    /// Next id for a commitment created on `today`: `comm-YYYYMMDD-NNN`.
    ///
    /// The sequence is one past the highest sequence already issued today,
    /// counting everything held in memory, saved or not. Ids therefore never
    /// repeat even if entries were removed from the file by hand.
    #[must_use]
    pub fn next_commitment_id(&self, today: NaiveDate) -> String {
        let prefix = format!("comm-{}-", today.format("%Y%m%d"));
        let highest = self
            .commitments
            .iter()
            .filter_map(|c| c.id.strip_prefix(&prefix))
            .filter_map(|seq| seq.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{prefix}{:03}", highest + 1)
    }

    /// Append a commitment and count it in the stats.
    pub fn push(&mut self, commitment: Commitment) {
        self.stats.record_detected(commitment.kind);
        self.commitments.push(commitment);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Commitment> {
        self.commitments.iter().find(|c| c.id == id)
    }

    /// Move a commitment to `status`. Returns the previous status, or `None`
    /// when no commitment has that id.
    pub fn transition(&mut self, id: &str, status: Status, at: DateTime<Utc>) -> Option<Status> {
        let commitment = self.commitments.iter_mut().find(|c| c.id == id)?;
        let previous = commitment.status;
        commitment.status = status;
        commitment.resolved_at = match status {
            Status::Pending => None,
            Status::Completed | Status::Dismissed => Some(at),
        };
        self.stats.record_transition(previous, status);
        Some(previous)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Commitment> {
        self.commitments.iter().filter(|c| c.is_pending())
    }

    pub fn with_status(&self, status: Status) -> impl Iterator<Item = &Commitment> {
        self.commitments.iter().filter(move |c| c.status == status)
    }
}
