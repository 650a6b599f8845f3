use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("queue serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("queue {} is locked by another scan", .0.display())]
    Locked(PathBuf),

    #[error("commitment id already queued: {0}")]
    DuplicateId(String),

    #[error("no commitment with id: {0}")]
    NotFound(String),
}
