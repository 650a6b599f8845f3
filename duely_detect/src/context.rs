//! Vault context matching: which known person and project a text is about.

use duely_core::{ContextMatch, KnowledgeBase, KnowledgeError, PersonPage, ProjectPage};
use std::collections::HashSet;

/// Links text to at most one known person and one known project.
#[derive(Debug, Clone)]
pub struct ContextMatcher<K> {
    knowledge: K,
}

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn person_matches(person: &PersonPage, lowered: &str, tokens: &HashSet<String>) -> bool {
    let full = person.name.trim().to_lowercase();
    if full.is_empty() {
        return false;
    }
    if lowered.contains(&full) {
        return true;
    }
    full.split(|c: char| !c.is_alphanumeric())
        .filter(|part| part.chars().count() >= 3)
        .any(|part| tokens.contains(part))
}

fn project_matches(project: &ProjectPage, lowered: &str) -> bool {
    project
        .keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .any(|k| !k.is_empty() && lowered.contains(&k))
}

impl<K: KnowledgeBase> ContextMatcher<K> {
    #[must_use]
    pub const fn new(knowledge: K) -> Self {
        Self { knowledge }
    }

    #[must_use]
    pub const fn knowledge(&self) -> &K {
        &self.knowledge
    }

    /// Find the person page and project page `text` refers to.
    ///
    /// A person matches when the full name appears in the text, or when
    /// one of its name parts of three or more letters appears as a whole
    /// word. A project matches when one of its keywords appears anywhere.
    /// Matching ignores case and the first hit in list order wins.
    pub fn match_to_vault_context(&self, text: &str) -> Result<ContextMatch, KnowledgeError> {
        let people = self.knowledge.list_people_pages()?;
        let projects = self.knowledge.list_projects()?;

        let lowered = text.to_lowercase();
        let tokens = words(text);

        Ok(ContextMatch {
            person_page: people
                .iter()
                .find(|p| person_matches(p, &lowered, &tokens))
                .map(|p| p.path.clone()),
            project: projects
                .iter()
                .find(|p| project_matches(p, &lowered))
                .map(|p| p.path.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duely_core::StaticKnowledgeBase;

    fn people() -> Vec<PersonPage> {
        vec![
            PersonPage::new("Sarah Chen", "05-Areas/People/Internal/Sarah_Chen.md", "internal"),
            PersonPage::new("John Smith", "05-Areas/People/External/John_Smith.md", "external"),
        ]
    }

    fn projects() -> Vec<ProjectPage> {
        vec![
            ProjectPage::new("Q1 Pricing Refresh", "04-Projects/Q1_Pricing_Refresh.md", ["pricing", "refresh"]),
            ProjectPage::new("Website Redesign", "04-Projects/Website_Redesign.md", ["website", "redesign"]),
        ]
    }

    fn matcher() -> ContextMatcher<StaticKnowledgeBase> {
        ContextMatcher::new(StaticKnowledgeBase::new(people(), projects()))
    }

    struct Offline;

    impl KnowledgeBase for Offline {
        fn list_people_pages(&self) -> Result<Vec<PersonPage>, KnowledgeError> {
            Err(KnowledgeError::Unavailable("vault not mounted".to_string()))
        }

        fn list_projects(&self) -> Result<Vec<ProjectPage>, KnowledgeError> {
            Ok(Vec::new())
        }
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_match_person_by_first_name() {
        let m = matcher().match_to_vault_context("Can Sarah review this?").expect("lookup");
        assert_eq!(m.person_page.as_deref(), Some("05-Areas/People/Internal/Sarah_Chen.md"));
        assert_eq!(m.project, None);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_match_person_by_full_name() {
        let m = matcher()
            .match_to_vault_context("looping in john smith on this")
            .expect("lookup");
        assert_eq!(m.person_page.as_deref(), Some("05-Areas/People/External/John_Smith.md"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_name_part_must_be_whole_word() {
        // "chenille" contains "chen" but is not the word "chen".
        let m = matcher()
            .match_to_vault_context("the chenille samples arrived")
            .expect("lookup");
        assert_eq!(m.person_page, None);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_match_project() {
        let m = matcher()
            .match_to_vault_context("Can you review the pricing proposal?")
            .expect("lookup");
        assert_eq!(m.project.as_deref(), Some("04-Projects/Q1_Pricing_Refresh.md"));
        assert_eq!(m.person_page, None);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_match_both() {
        let m = matcher()
            .match_to_vault_context("Sarah needs to review the WEBSITE deck")
            .expect("lookup");
        assert!(m.person_page.is_some());
        assert_eq!(m.project.as_deref(), Some("04-Projects/Website_Redesign.md"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_first_in_list_order_wins() {
        let m = matcher()
            .match_to_vault_context("Sarah and John: pricing and website")
            .expect("lookup");
        assert_eq!(m.person_page.as_deref(), Some("05-Areas/People/Internal/Sarah_Chen.md"));
        assert_eq!(m.project.as_deref(), Some("04-Projects/Q1_Pricing_Refresh.md"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_empty_knowledge_base() {
        let m = ContextMatcher::new(StaticKnowledgeBase::default())
            .match_to_vault_context("Sarah needs the pricing deck")
            .expect("lookup");
        assert_eq!(m, ContextMatch::default());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_unrelated_text_matches_nothing() {
        let m = matcher()
            .match_to_vault_context("The standup moved to 10am tomorrow")
            .expect("lookup");
        assert_eq!(m.person_page, None);
        assert_eq!(m.project, None);
    }

    #[test]
    fn test_unavailable_is_an_error() {
        let result = ContextMatcher::new(Offline).match_to_vault_context("Sarah");
        assert!(matches!(result, Err(KnowledgeError::Unavailable(_))));
    }
}
