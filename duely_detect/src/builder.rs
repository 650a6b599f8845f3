//! Composition of classifier, resolvers and context matcher into a
//! [`Commitment`] record.

use chrono::NaiveDate;
use duely_core::{Clock, Commitment, Event, KnowledgeBase, KnowledgeError, Queue, Status};
use tracing::debug;

use crate::context::ContextMatcher;
use crate::patterns::{PatternLibrary, default_library};
use crate::person::SourceApps;

/// Id for the next commitment detected on `today`, given everything
/// already in `queue` (persisted or appended since the last save).
#[must_use]
pub fn generate_commitment_id(queue: &Queue, today: NaiveDate) -> String {
    queue.next_commitment_id(today)
}

/// Turns events into commitments.
pub struct CommitmentBuilder<K, C> {
    library: PatternLibrary,
    apps: SourceApps,
    matcher: ContextMatcher<K>,
    clock: C,
}

impl<K: KnowledgeBase, C: Clock> CommitmentBuilder<K, C> {
    /// Builder with the built-in rules and app lists.
    #[must_use]
    pub fn new(knowledge: K, clock: C) -> Self {
        Self {
            library: default_library().clone(),
            apps: SourceApps::default(),
            matcher: ContextMatcher::new(knowledge),
            clock,
        }
    }

    #[must_use]
    pub fn with_library(mut self, library: PatternLibrary) -> Self {
        self.library = library;
        self
    }

    #[must_use]
    pub fn with_apps(mut self, apps: SourceApps) -> Self {
        self.apps = apps;
        self
    }

    #[must_use]
    pub const fn library(&self) -> &PatternLibrary {
        &self.library
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Build the commitment `event` describes, if any.
    ///
    /// Returns `Ok(None)` when the text is not a commitment. The id is
    /// derived from `queue`, so append each result before building the next.
    pub fn build(&self, event: &Event, queue: &Queue) -> Result<Option<Commitment>, KnowledgeError> {
        let Some(classification) = self.library.classify(&event.text) else {
            return Ok(None);
        };

        let today = self.clock.today();
        let deadline = self.library.resolve_deadline(&event.text, today);
        let person = self
            .library
            .resolve_person(&self.apps, &event.text, &event.source_app);
        let context = self.matcher.match_to_vault_context(&event.text)?;

        let commitment = Commitment {
            id: generate_commitment_id(queue, today),
            kind: classification.kind,
            pattern: classification.pattern,
            raw_text: event.text.clone(),
            source_app: event.source_app.clone(),
            deadline,
            person,
            person_page: context.person_page,
            project: context.project,
            event_timestamp: Some(event.timestamp),
            created_at: self.clock.now(),
            status: Status::Pending,
            resolved_at: None,
        };
        debug!(
            "Built {} ({} / {}) from {}",
            commitment.id, commitment.kind, commitment.pattern, commitment.source_app
        );
        Ok(Some(commitment))
    }
}
