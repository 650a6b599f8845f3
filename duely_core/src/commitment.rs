//! Commitment records and the events they are detected from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A captured piece of communication text, supplied by the event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub text: String,
    pub source_app: String,
    #[serde(with = "crate::time_format")]
    pub timestamp: DateTime<Utc>,
}

impl Event {
    #[must_use]
    pub fn new(text: impl Into<String>, source_app: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            source_app: source_app.into(),
            timestamp,
        }
    }

    /// Hash identifying this capture, used to skip duplicates within a batch.
    #[must_use]
    pub fn content_hash(&self) -> String {
        crate::content_hash(&self.source_app, &self.timestamp.to_rfc3339(), &self.text)
    }
}

/// Direction of a commitment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentType {
    /// Someone asks the reader to do something.
    Inbound,
    /// The author promises to do something.
    Outbound,
}

impl CommitmentType {
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl std::fmt::Display for CommitmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitmentType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            _ => Err("unknown commitment type"),
        }
    }
}

/// How a deadline phrase was expressed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineType {
    Today,
    Tomorrow,
    ThisWeek,
    DayOfWeek,
    Urgent,
}

impl DeadlineType {
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::ThisWeek => "this_week",
            Self::DayOfWeek => "day_of_week",
            Self::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for DeadlineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeadlineType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            "this_week" => Ok(Self::ThisWeek),
            "day_of_week" => Ok(Self::DayOfWeek),
            "urgent" => Ok(Self::Urgent),
            _ => Err("unknown deadline type"),
        }
    }
}

/// A resolved deadline. The date and its type always travel together.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deadline {
    #[serde(rename = "deadline")]
    pub date: NaiveDate,
    pub deadline_type: DeadlineType,
}

impl Deadline {
    #[must_use]
    pub const fn new(date: NaiveDate, deadline_type: DeadlineType) -> Self {
        Self { date, deadline_type }
    }
}

/// Review state of a queued commitment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    Completed,
    Dismissed,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Dismissed => "dismissed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" | "done" => Ok(Self::Completed),
            "dismissed" => Ok(Self::Dismissed),
            _ => Err("unknown status"),
        }
    }
}

/// A detected commitment as stored in the queue.
///
/// Only `id` and `type` are required on read. Records written by older or
/// hand-edited queues may lack the rest and still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CommitmentType,
    /// Label of the classifier rule that matched.
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub source_app: String,
    #[serde(flatten)]
    pub deadline: Option<Deadline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::time_format::option")]
    pub event_timestamp: Option<DateTime<Utc>>,
    /// Unix epoch when the record predates this field.
    #[serde(default, with = "crate::time_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::time_format::option")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Commitment {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, Status::Pending)
    }

    /// Date the id was issued on, parsed from the `comm-YYYYMMDD-NNN` shape.
    #[must_use]
    pub fn id_date(&self) -> Option<NaiveDate> {
        let date = self.id.strip_prefix("comm-")?.split('-').next()?;
        NaiveDate::parse_from_str(date, "%Y%m%d").ok()
    }
}
