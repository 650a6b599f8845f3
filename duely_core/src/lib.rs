#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Shared types and capability traits for the commitment pipeline.

pub mod clock;
pub mod commitment;
pub mod context;
pub mod error;
pub mod queue;
pub mod source;
mod time_format;
mod util;

pub use clock::{Clock, FixedClock, SystemClock};
pub use commitment::{Commitment, CommitmentType, Deadline, DeadlineType, Event, Status};
pub use context::{ContextMatch, KnowledgeBase, PersonPage, ProjectPage, StaticKnowledgeBase};
pub use error::{KnowledgeError, SourceError};
pub use queue::{Queue, QueueStats};
pub use source::EventSource;
pub use util::content_hash;
