use anyhow::Context;
use duely_detect::{PatternLibrary, RuleSet, SourceApps, default_library};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR: &str = "duely";
const CONFIG_FILE: &str = "config.json";

fn app_dir() -> anyhow::Result<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
        .join(APP_DIR))
}

/// Replace a leading `~` with the home directory. Other paths are returned
/// unchanged, as is everything when no home directory is known.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub apps: SourceApps,
    /// Replacement rule library. Sections left out keep the built-in rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<RuleSet>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QueueConfig {
    #[serde(default = "QueueConfig::default_path")]
    pub path: PathBuf,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl QueueConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("~")
            .join(APP_DIR)
            .join("commitment_queue.json")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VaultConfig {
    /// Vault root. Without one, context matching finds nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default = "VaultConfig::default_people_dir")]
    pub people_dir: String,
    #[serde(default = "VaultConfig::default_projects_dir")]
    pub projects_dir: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: None,
            people_dir: Self::default_people_dir(),
            projects_dir: Self::default_projects_dir(),
        }
    }
}

impl VaultConfig {
    fn default_people_dir() -> String {
        "05-Areas/People".to_string()
    }

    fn default_projects_dir() -> String {
        "04-Projects".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScanConfig {
    /// JSON or JSON-lines export of captured events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_path: Option<PathBuf>,
    #[serde(default = "ScanConfig::default_window_minutes")]
    pub window_minutes: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            events_path: None,
            window_minutes: Self::default_window_minutes(),
        }
    }
}

impl ScanConfig {
    const fn default_window_minutes() -> u32 {
        60
    }
}

impl Config {
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(app_dir()?.join(CONFIG_FILE))
    }

    /// Load `~/duely/config.json`, or the defaults when it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "No config at {}, using defaults. Run 'duely init' to create one.",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = app_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Write a config file with every default spelled out.
    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::ensure_config_dir()?.join(CONFIG_FILE);
        Self::default().write_new(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Set vault.root to your notes folder to link people and projects");
        println!("   2. Set scan.events_path to the file your capture service exports");
        println!("   3. Run 'duely scan' to detect commitments");
        println!();
        Ok(config_path)
    }

    /// Write this config to `path`, refusing to replace an existing file.
    pub fn write_new(&self, path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content + "\n")
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    #[must_use]
    pub fn queue_path(&self) -> PathBuf {
        expand_home(&self.queue.path)
    }

    #[must_use]
    pub fn vault_root(&self) -> Option<PathBuf> {
        self.vault.root.as_deref().map(expand_home)
    }

    #[must_use]
    pub fn events_path(&self) -> Option<PathBuf> {
        self.scan.events_path.as_deref().map(expand_home)
    }

    /// The rule library to detect with: the configured rules, or the
    /// built-in ones.
    pub fn pattern_library(&self) -> anyhow::Result<PatternLibrary> {
        match &self.patterns {
            Some(rules) => {
                PatternLibrary::compile(rules).context("Invalid rule in config 'patterns'")
            }
            None => Ok(default_library().clone()),
        }
    }
}
