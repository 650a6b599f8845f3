//! Counterparty name extraction.

use serde::{Deserialize, Serialize};

use crate::patterns::{PatternLibrary, PersonCue, default_library};

/// Words that open a `Word: ...` line without naming a sender.
const HEADER_WORDS: &[&str] = &[
    "from", "to", "cc", "bcc", "subject", "re", "fwd", "fw", "date", "sent", "reply", "note",
    "update", "reminder", "todo", "fyi", "ps", "edit",
];

/// Kind of application a piece of text was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    Chat,
    Email,
    Other,
}

/// Application names that count as chat or email sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceApps {
    #[serde(default = "default_chat_apps")]
    pub chat: Vec<String>,
    #[serde(default = "default_email_apps")]
    pub email: Vec<String>,
}

fn default_chat_apps() -> Vec<String> {
    ["Slack", "Teams", "Discord", "Messages", "WhatsApp", "Telegram", "Signal"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_email_apps() -> Vec<String> {
    ["Mail", "Gmail", "Outlook", "Superhuman", "Spark", "Thunderbird"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for SourceApps {
    fn default() -> Self {
        Self {
            chat: default_chat_apps(),
            email: default_email_apps(),
        }
    }
}

impl SourceApps {
    /// Classify a source-application label. A label counts as a known app
    /// when it contains the app name, ignoring case, so `"Slack - #eng"`
    /// is chat. Chat names are checked first.
    #[must_use]
    pub fn kind_of(&self, source_app: &str) -> AppKind {
        let label = source_app.to_lowercase();
        let contains = |names: &[String]| {
            names
                .iter()
                .any(|n| !n.is_empty() && label.contains(&n.to_lowercase()))
        };
        if contains(&self.chat) {
            AppKind::Chat
        } else if contains(&self.email) {
            AppKind::Email
        } else {
            AppKind::Other
        }
    }
}

fn is_header_word(name: &str) -> bool {
    name.split_whitespace()
        .next()
        .is_some_and(|first| HEADER_WORDS.iter().any(|w| first.eq_ignore_ascii_case(w)))
}

fn clean_display_name(raw: &str) -> Option<String> {
    let name = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

impl PatternLibrary {
    /// Find the most likely counterparty in `text`.
    ///
    /// An `@mention` counts for any source. A leading `Name:` only counts
    /// for chat apps and a `From:` header line only for email apps.
    #[must_use]
    pub fn resolve_person(&self, apps: &SourceApps, text: &str, source_app: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let kind = apps.kind_of(source_app);

        for rule in self.person() {
            let applies = match rule.label {
                PersonCue::Mention => true,
                PersonCue::MessagePrefix => kind == AppKind::Chat,
                PersonCue::EmailHeader => kind == AppKind::Email,
            };
            if !applies {
                continue;
            }
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            let Some(raw) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };

            let name = match rule.label {
                PersonCue::Mention => Some(raw.as_str().trim_start_matches('@').to_string()),
                PersonCue::MessagePrefix => {
                    let name = raw.as_str().trim();
                    (!is_header_word(name)).then(|| name.to_string())
                }
                PersonCue::EmailHeader => clean_display_name(raw.as_str()),
            };
            if let Some(name) = name.filter(|n| !n.is_empty()) {
                return Some(name);
            }
        }
        None
    }
}

/// Find a counterparty with the built-in rules and app lists.
#[must_use]
pub fn extract_person_name(text: &str, source_app: &str) -> Option<String> {
    default_library().resolve_person(&SourceApps::default(), text, source_app)
}
