//! Configurable rule library for commitment detection.
//!
//! Every concern (commitment type, deadline phrase, person cue) is an
//! ordered list of `(pattern, label)` rules. Evaluation order is list order
//! and the first match wins, so precedence is a property of the data and can
//! be checked without running the engine. Definitions are serialisable so a
//! deployment can replace them from configuration.

use duely_core::{CommitmentType, DeadlineType};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

/// Error type for rule compilation.
#[derive(Debug)]
pub enum BuildError {
    /// The regex pattern is invalid.
    Regex { label: String, message: String },

    /// A deadline rule names an unknown deadline type.
    DeadlineType(String),

    /// A person rule names an unknown cue.
    PersonCue(String),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regex { label, message } => write!(f, "invalid regex for rule {label}: {message}"),
            Self::DeadlineType(l) => write!(f, "invalid deadline type: {l}"),
            Self::PersonCue(l) => write!(f, "invalid person cue: {l}"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Definition of a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    /// What a match means: a sub-pattern label, a deadline type or a person cue.
    pub label: String,

    /// Regex pattern to match text.
    pub pattern: String,
}

impl RuleDef {
    #[must_use]
    pub fn new(label: &str, pattern: &str) -> Self {
        Self {
            label: label.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

/// Where a person name was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonCue {
    /// `@name` anywhere in the text.
    Mention,
    /// `Name: body` at the start of a chat message.
    MessagePrefix,
    /// `From: Name` header line of an email.
    EmailHeader,
}

impl PersonCue {
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Mention => "mention",
            Self::MessagePrefix => "message_prefix",
            Self::EmailHeader => "email_header",
        }
    }
}

impl FromStr for PersonCue {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mention" => Ok(Self::Mention),
            "message_prefix" => Ok(Self::MessagePrefix),
            "email_header" => Ok(Self::EmailHeader),
            _ => Err("unknown person cue"),
        }
    }
}

/// Rule definitions for all concerns, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default = "inbound_rules")]
    pub inbound: Vec<RuleDef>,
    #[serde(default = "outbound_rules")]
    pub outbound: Vec<RuleDef>,
    #[serde(default = "deadline_rules")]
    pub deadline: Vec<RuleDef>,
    #[serde(default = "person_rules")]
    pub person: Vec<RuleDef>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            inbound: inbound_rules(),
            outbound: outbound_rules(),
            deadline: deadline_rules(),
            person: person_rules(),
        }
    }
}

/// Inbound asks. Direct requests first, then input requests, then assignment.
fn inbound_rules() -> Vec<RuleDef> {
    vec![
        RuleDef::new("direct_request", r"\b(?:can|could|would)\s+you\b"),
        RuleDef::new(
            "direct_request",
            r"\bplease\s+(?:review|send|check|look|take|share|confirm|update|forward|sign|approve|fix|get\s+back)\b",
        ),
        RuleDef::new("direct_request", r"\b(?:let\s+me\s+know|lmk)\b"),
        RuleDef::new(
            "need_input",
            r"\b(?:need|needs|needed|could\s+use|would\s+love|want)\s+your\s+(?:input|review|feedback|thoughts|sign[\s-]?off|approval|help|eyes|opinion|take)\b",
        ),
        RuleDef::new("need_input", r"\bwaiting\s+(?:on|for)\s+(?:you|your)\b"),
        RuleDef::new("assignment", r"\bassign(?:ed|ing)\b[^.!?\n]{0,40}?\bto\s+you\b"),
        RuleDef::new(
            "assignment",
            r"\byou(?:['’]ve|['’]re|\s+have|\s+are)\s+(?:been\s+)?assigned\b",
        ),
        RuleDef::new("assignment", r"\baction\s+items?\s+for\s+you\b"),
    ]
}

/// Outbound promises, most specific first: follow-ups and agreements are
/// checked before the general "I'll ..." promise.
fn outbound_rules() -> Vec<RuleDef> {
    vec![
        RuleDef::new(
            "follow_up",
            r"\b(?:i['’]ll|i\s+will|i\s+shall|let\s+me)\s+(?:get\s+back\s+to\s+you|follow[\s-]?up|circle\s+back|loop\s+back)",
        ),
        RuleDef::new(
            "agreement",
            r"\b(?:sure|yes|yep|yeah|ok|okay|absolutely|definitely|of\s+course|sounds\s+good)\b[\s,.!-]*(?:i['’]ll|i\s+will|i\s+can|i['’]m\s+on\s+it|will\s+do)\b",
        ),
        RuleDef::new("agreement", r"^\s*(?:will\s+do|on\s+it)\b"),
        RuleDef::new(
            "promise",
            r"\bi(?:['’]ll|\s+will|\s+shall|['’]m\s+going\s+to|\s+am\s+going\s+to|['’]m\s+gonna)\b",
        ),
        RuleDef::new(
            "promise",
            r"\blet\s+me\s+(?:send|check|look|find|get|share|ping|draft|review)\b",
        ),
    ]
}

/// Deadline phrases in priority order: today, tomorrow, this week, a named
/// weekday, urgent.
fn deadline_rules() -> Vec<RuleDef> {
    vec![
        RuleDef::new(
            "today",
            r"\b(?:eod|cob|end\s+of\s+(?:the\s+)?day|end\s+of\s+today|close\s+of\s+business|by\s+today|tonight)\b",
        ),
        RuleDef::new("tomorrow", r"\b(?:tomorrow|tmrw)\b"),
        RuleDef::new("this_week", r"\b(?:eow|end\s+of\s+(?:the\s+)?week|this\s+week)\b"),
        RuleDef::new(
            "day_of_week",
            r"\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b|\bby\s+(mon|tues?|wed|thu(?:rs?)?|fri|sat|sun)\b",
        ),
        RuleDef::new("urgent", r"\b(?:asap|urgent(?:ly)?|immediately|right\s+away)\b"),
    ]
}

/// Person cues. These are case-sensitive: a capitalised prefix is what
/// makes `Name:` look like a sender rather than a label.
fn person_rules() -> Vec<RuleDef> {
    vec![
        RuleDef::new("mention", r"(?:^|[^\w@.])@(\w+)"),
        RuleDef::new(
            "message_prefix",
            r"^\s*([A-Z][\w.'-]*(?:[ \t]+[A-Z][\w.'-]*){0,3})[ \t]*:\s+\S",
        ),
        RuleDef::new(
            "email_header",
            r"(?m)^[ \t]*(?i:from):[ \t]*([^<\r\n]*?)[ \t]*(?:<[^>\r\n]*>)?[ \t\r]*$",
        ),
    ]
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule<L> {
    pub label: L,
    pub regex: Regex,
}

impl<L> Rule<L> {
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

fn compile(def: &RuleDef, case_insensitive: bool) -> Result<Regex, BuildError> {
    RegexBuilder::new(&def.pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| BuildError::Regex {
            label: def.label.clone(),
            message: e.to_string(),
        })
}

fn compile_labelled(defs: &[RuleDef]) -> Result<Vec<Rule<String>>, BuildError> {
    defs.iter()
        .map(|def| -> Result<Rule<String>, BuildError> {
            Ok(Rule {
                label: def.label.clone(),
                regex: compile(def, true)?,
            })
        })
        .collect()
}

/// Compiled rules for every concern.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    inbound: Vec<Rule<String>>,
    outbound: Vec<Rule<String>>,
    deadline: Vec<Rule<DeadlineType>>,
    person: Vec<Rule<PersonCue>>,
}

impl PatternLibrary {
    /// Compile a rule set.
    ///
    /// Commitment-type and deadline rules are always matched
    /// case-insensitively; person rules are compiled as written.
    ///
    /// # Errors
    /// Returns an error if a pattern is invalid or a label is unknown.
    pub fn compile(set: &RuleSet) -> Result<Self, BuildError> {
        let deadline = set
            .deadline
            .iter()
            .map(|def| -> Result<Rule<DeadlineType>, BuildError> {
                let label = DeadlineType::from_str(&def.label)
                    .map_err(|_| BuildError::DeadlineType(def.label.clone()))?;
                Ok(Rule {
                    label,
                    regex: compile(def, true)?,
                })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        let person = set
            .person
            .iter()
            .map(|def| -> Result<Rule<PersonCue>, BuildError> {
                let label = PersonCue::from_str(&def.label)
                    .map_err(|_| BuildError::PersonCue(def.label.clone()))?;
                Ok(Rule {
                    label,
                    regex: compile(def, false)?,
                })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        Ok(Self {
            inbound: compile_labelled(&set.inbound)?,
            outbound: compile_labelled(&set.outbound)?,
            deadline,
            person,
        })
    }

    /// Compile the built-in rule set.
    ///
    /// # Errors
    /// Returns an error if a built-in pattern fails to compile.
    pub fn with_defaults() -> Result<Self, BuildError> {
        Self::compile(&RuleSet::default())
    }

    #[must_use]
    pub fn inbound(&self) -> &[Rule<String>] {
        &self.inbound
    }

    #[must_use]
    pub fn outbound(&self) -> &[Rule<String>] {
        &self.outbound
    }

    #[must_use]
    pub fn deadline(&self) -> &[Rule<DeadlineType>] {
        &self.deadline
    }

    #[must_use]
    pub fn person(&self) -> &[Rule<PersonCue>] {
        &self.person
    }

    /// Commitment-type rules in evaluation order: every inbound rule, then
    /// every outbound rule.
    pub fn commitment_rules(&self) -> impl Iterator<Item = (CommitmentType, &Rule<String>)> {
        self.inbound
            .iter()
            .map(|r| (CommitmentType::Inbound, r))
            .chain(self.outbound.iter().map(|r| (CommitmentType::Outbound, r)))
    }
}

static DEFAULT_LIBRARY: OnceLock<PatternLibrary> = OnceLock::new();

/// Shared library compiled from the built-in rules.
#[expect(
    clippy::expect_used,
    reason = "Built-in rule patterns are covered by tests"
)]
pub fn default_library() -> &'static PatternLibrary {
    DEFAULT_LIBRARY.get_or_init(|| {
        PatternLibrary::with_defaults().expect("built-in rule patterns are valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_defaults_compile() {
        let library = PatternLibrary::with_defaults().expect("defaults should compile");
        assert!(!library.inbound().is_empty());
        assert!(!library.outbound().is_empty());
        assert_eq!(library.deadline().len(), 5);
        assert_eq!(library.person().len(), 3);
    }

    #[test]
    fn test_inbound_rules_precede_outbound() {
        let kinds: Vec<_> = default_library()
            .commitment_rules()
            .map(|(kind, _)| kind)
            .collect();
        let first_outbound = kinds
            .iter()
            .position(|k| *k == CommitmentType::Outbound)
            .unwrap_or(kinds.len());
        assert!(kinds[..first_outbound]
            .iter()
            .all(|k| *k == CommitmentType::Inbound));
        assert!(kinds[first_outbound..]
            .iter()
            .all(|k| *k == CommitmentType::Outbound));
    }

    #[test]
    fn test_deadline_priority_order() {
        let order: Vec<_> = default_library().deadline().iter().map(|r| r.label).collect();
        assert_eq!(
            order,
            vec![
                DeadlineType::Today,
                DeadlineType::Tomorrow,
                DeadlineType::ThisWeek,
                DeadlineType::DayOfWeek,
                DeadlineType::Urgent,
            ]
        );
    }

    #[test]
    fn test_outbound_specific_rules_first() {
        let labels: Vec<_> = default_library()
            .outbound()
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        let promise = labels.iter().position(|l| *l == "promise");
        let follow_up = labels.iter().position(|l| *l == "follow_up");
        let agreement = labels.iter().position(|l| *l == "agreement");
        assert!(follow_up < promise);
        assert!(agreement < promise);
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let set = RuleSet {
            inbound: vec![RuleDef::new("broken", r"(unclosed")],
            ..RuleSet::default()
        };
        let err = PatternLibrary::compile(&set);
        assert!(matches!(err, Err(BuildError::Regex { label, .. }) if label == "broken"));
    }

    #[test]
    fn test_unknown_deadline_label_is_reported() {
        let set = RuleSet {
            deadline: vec![RuleDef::new("next_month", r"next month")],
            ..RuleSet::default()
        };
        assert!(matches!(
            PatternLibrary::compile(&set),
            Err(BuildError::DeadlineType(l)) if l == "next_month"
        ));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_rule_set_serialization() {
        let set = RuleSet::default();
        let json = serde_json::to_string(&set).expect("rule set should serialize");
        let back: RuleSet = serde_json::from_str(&json).expect("valid JSON should deserialize");
        assert_eq!(back, set);

        // Omitted sections fall back to the built-in rules.
        let partial: RuleSet = serde_json::from_str(r#"{"inbound": []}"#)
            .expect("valid JSON should deserialize");
        assert!(partial.inbound.is_empty());
        assert_eq!(partial.outbound, set.outbound);
    }
}
