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

//! Commitment detection: classification, deadline and person resolution,
//! context matching, and the scan pass that feeds the queue.

pub mod builder;
pub mod classifier;
pub mod context;
pub mod deadline;
pub mod patterns;
pub mod person;
pub mod scanner;

pub use builder::{CommitmentBuilder, generate_commitment_id};
pub use classifier::{Classification, detect_commitment_type};
pub use context::ContextMatcher;
pub use deadline::{end_of_week, extract_deadline, next_weekday};
pub use patterns::{BuildError, PatternLibrary, PersonCue, Rule, RuleDef, RuleSet, default_library};
pub use person::{AppKind, SourceApps, extract_person_name};
pub use scanner::{ScanError, ScanReport, Scanner};
