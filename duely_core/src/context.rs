//! Knowledge-base records and the lookup capability the context matcher uses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::KnowledgeError;

/// A known person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPage {
    pub name: String,
    pub path: String,
    /// Grouping of the person, e.g. `internal` or `external`.
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl PersonPage {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: kind.into(),
        }
    }
}

/// A known project record with the keywords that identify it in text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPage {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
}

impl ProjectPage {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, path: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            path: path.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of linking text to knowledge-base records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMatch {
    pub person_page: Option<String>,
    pub project: Option<String>,
}

/// Lookup of known people and projects.
///
/// List order matters: the matcher takes the first hit, so implementations
/// decide tie-breaks through the order they return.
pub trait KnowledgeBase: Send + Sync {
    fn list_people_pages(&self) -> Result<Vec<PersonPage>, KnowledgeError>;

    fn list_projects(&self) -> Result<Vec<ProjectPage>, KnowledgeError>;
}

/// In-memory knowledge base. Empty by default, which is what the pipeline
/// uses when no vault is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticKnowledgeBase {
    pub people: Vec<PersonPage>,
    pub projects: Vec<ProjectPage>,
}

impl StaticKnowledgeBase {
    #[must_use]
    pub const fn new(people: Vec<PersonPage>, projects: Vec<ProjectPage>) -> Self {
        Self { people, projects }
    }
}

impl KnowledgeBase for StaticKnowledgeBase {
    fn list_people_pages(&self) -> Result<Vec<PersonPage>, KnowledgeError> {
        Ok(self.people.clone())
    }

    fn list_projects(&self) -> Result<Vec<ProjectPage>, KnowledgeError> {
        Ok(self.projects.clone())
    }
}

impl<T: KnowledgeBase + ?Sized> KnowledgeBase for &T {
    fn list_people_pages(&self) -> Result<Vec<PersonPage>, KnowledgeError> {
        (**self).list_people_pages()
    }

    fn list_projects(&self) -> Result<Vec<ProjectPage>, KnowledgeError> {
        (**self).list_projects()
    }
}

impl<T: KnowledgeBase + ?Sized> KnowledgeBase for Box<T> {
    fn list_people_pages(&self) -> Result<Vec<PersonPage>, KnowledgeError> {
        (**self).list_people_pages()
    }

    fn list_projects(&self) -> Result<Vec<ProjectPage>, KnowledgeError> {
        (**self).list_projects()
    }
}
