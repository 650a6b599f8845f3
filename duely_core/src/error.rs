use thiserror::Error;

/// Failure of the external knowledge base. Distinct from "no match found",
/// which is an empty result.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("knowledge base unavailable: {0}")]
    Unavailable(String),

    #[error("knowledge base IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of the upstream event source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("event source unavailable: {0}")]
    Unavailable(String),

    #[error("event source IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed event at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
