//! Content hashing for event deduplication.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 content hash over an event's provenance and text.
#[must_use]
pub fn content_hash(source_app: &str, timestamp: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_app.as_bytes());
    hasher.update(b":");
    hasher.update(timestamp.as_bytes());
    hasher.update(b":");
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_hash() {
        let h1 = content_hash("Slack", "2026-02-04T12:00:00+00:00", "can you review?");
        let h2 = content_hash("Slack", "2026-02-04T12:00:00+00:00", "can you review?");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64); // SHA-256 hex length
    }

    #[test]
    fn different_sources_different_hashes() {
        let h1 = content_hash("Slack", "2026-02-04T12:00:00+00:00", "can you review?");
        let h2 = content_hash("Gmail", "2026-02-04T12:00:00+00:00", "can you review?");
        assert_ne!(h1, h2);
    }
}
