//! Commitment-type classification.

use duely_core::CommitmentType;
use serde::{Deserialize, Serialize};

use crate::patterns::{PatternLibrary, default_library};

/// Outcome of a successful classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub kind: CommitmentType,
    /// Label of the rule that matched.
    pub pattern: String,
}

impl PatternLibrary {
    /// Classify `text` as an inbound ask, an outbound promise, or neither.
    ///
    /// Inbound rules run before outbound rules and the first matching rule
    /// wins. Empty or whitespace-only text never matches.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<Classification> {
        if text.trim().is_empty() {
            return None;
        }
        self.commitment_rules()
            .find(|(_, rule)| rule.is_match(text))
            .map(|(kind, rule)| Classification {
                kind,
                pattern: rule.label.clone(),
            })
    }
}

/// Classify `text` with the built-in rules.
#[must_use]
pub fn detect_commitment_type(text: &str) -> Option<Classification> {
    default_library().classify(text)
}
