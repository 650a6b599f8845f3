//! Knowledge base backed by a folder of markdown notes.
//!
//! People live one level below the people directory, grouped by type
//! (`People/Internal/Sarah_Chen.md`). Projects are the markdown files of
//! the projects directory. Paths handed out are relative to the vault root
//! and always use `/`.

use duely_core::{KnowledgeBase, KnowledgeError, PersonPage, ProjectPage};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const MIN_KEYWORD_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct VaultKnowledgeBase {
    root: PathBuf,
    people_dir: String,
    projects_dir: String,
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_markdown(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Entries of `dir` sorted by file name. A missing directory is empty.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, KnowledgeError> {
    let reader = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist, nothing to list", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let mut paths = reader
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

/// Keywords a project page declares on a `keywords: a, b, c` line.
fn declared_keywords(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (key, rest) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case("keywords").then_some(rest)
        })
        .flat_map(|rest| rest.split(','))
        .map(|k| {
            k.trim()
                .trim_matches(|c| matches!(c, '[' | ']' | '"' | '\''))
                .trim()
                .to_lowercase()
        })
        .filter(|k| !k.is_empty())
        .collect()
}

fn name_keywords(name: &str) -> impl Iterator<Item = String> + '_ {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN)
        .map(str::to_lowercase)
}

impl VaultKnowledgeBase {
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        people_dir: impl Into<String>,
        projects_dir: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            people_dir: people_dir.into(),
            projects_dir: projects_dir.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<(), KnowledgeError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(KnowledgeError::Unavailable(format!(
                "vault {} is not a directory",
                self.root.display()
            )))
        }
    }

    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn person(&self, path: &Path, kind: &str) -> PersonPage {
        PersonPage::new(display_name(path), self.relative(path), kind)
    }
}

impl KnowledgeBase for VaultKnowledgeBase {
    fn list_people_pages(&self) -> Result<Vec<PersonPage>, KnowledgeError> {
        self.ensure_root()?;
        let mut people = Vec::new();

        for entry in sorted_entries(&self.root.join(&self.people_dir))? {
            if entry.is_dir() {
                let kind = entry
                    .file_name()
                    .map(|n| n.to_string_lossy().to_lowercase())
                    .unwrap_or_default();
                for page in sorted_entries(&entry)? {
                    if is_markdown(&page) {
                        people.push(self.person(&page, &kind));
                    }
                }
            } else if is_markdown(&entry) {
                people.push(self.person(&entry, ""));
            }
        }

        debug!("Vault lists {} people", people.len());
        Ok(people)
    }

    fn list_projects(&self) -> Result<Vec<ProjectPage>, KnowledgeError> {
        self.ensure_root()?;
        let mut projects = Vec::new();

        for page in sorted_entries(&self.root.join(&self.projects_dir))? {
            if !is_markdown(&page) {
                continue;
            }
            let name = display_name(&page);
            let content = fs::read_to_string(&page)?;
            let keywords: BTreeSet<String> = name_keywords(&name)
                .chain(declared_keywords(&content))
                .collect();
            projects.push(ProjectPage::new(name, self.relative(&page), keywords));
        }

        debug!("Vault lists {} projects", projects.len());
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("People/Internal/Sarah_Chen.md")), "Sarah Chen");
        assert_eq!(display_name(Path::new("Mary-Jane__Watson.md")), "Mary Jane Watson");
    }

    #[test]
    fn test_declared_keywords() {
        let content = "# Q1 Pricing\n\nKeywords: pricing, Plans , [tiers]\nstatus: active\n";
        assert_eq!(declared_keywords(content), vec!["pricing", "plans", "tiers"]);
        assert!(declared_keywords("no keywords here").is_empty());
    }

    #[test]
    fn test_name_keywords_skip_short_words() {
        let words: Vec<_> = name_keywords("Q1 Pricing Refresh for Web").collect();
        assert_eq!(words, vec!["pricing", "refresh"]);
    }
}
