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

//! Durable storage for the commitment queue.
//!
//! The queue lives in a single JSON document. Writes go through a temp file
//! in the same directory followed by a rename, so a crash mid-write leaves
//! the previous document intact. A [`QueueStore`] holds an exclusive lock
//! file for as long as it is open, which makes a second concurrent scan fail
//! instead of racing the first one.

mod error;
mod lock;
mod store;

pub use error::{QueueError, Result};
pub use lock::{QueueLock, lock_path};
pub use store::{QueueStore, load_queue, save_queue};
