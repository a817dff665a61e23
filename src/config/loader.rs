//! Config structs and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the caller)
//! 2. `.revq.toml` in the working directory (repo config)
//! 3. `~/.config/revq/config.toml` (user config)
//! 4. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// User-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub queue: QueueConfig,
    pub redaction: RedactionConfig,
    pub prompt: PromptConfig,
    pub user_rules: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            queue: QueueConfig::default(),
            redaction: RedactionConfig::default(),
            prompt: PromptConfig::default(),
            user_rules: Vec::new(),
        }
    }
}

/// AI provider process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Command to invoke (must accept a prompt and a JSON schema).
    pub command: String,
    /// Extra arguments placed before the built-in ones.
    pub args: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            args: Vec::new(),
        }
    }
}

/// Defaults for the `queue` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub default_limit: usize,
    pub default_sort: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            default_limit: 200,
            default_sort: "oldest".to_string(),
        }
    }
}

/// Secret redaction toggle for prompt inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionConfig {
    pub enabled: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Prompt template override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Path to a replacement prompt template. Built-in template when unset.
    pub template_path: Option<PathBuf>,
}

/// Repository-level configuration (`.revq.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub repo_rules: Vec<String>,
    pub diff: DiffConfig,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            repo_rules: Vec::new(),
            diff: DiffConfig::default(),
        }
    }
}

/// Diff chunking knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Gitignore-style globs excluded from the prompt.
    pub ignore: Vec<String>,
    /// Maximum number of files included in the prompt.
    pub max_files: usize,
    /// Maximum characters per prompt chunk.
    pub max_chunk_chars: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            max_files: 50,
            max_chunk_chars: 8000,
        }
    }
}

impl Config {
    /// Load the user config, preferring `override_path` when given.
    ///
    /// A missing file is not an error; defaults apply. Zero-valued
    /// numeric fields written explicitly fall back to the defaults.
    pub fn load(override_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let mut config: Config = load_toml(&path)?;
        if config.provider.command.is_empty() {
            config.provider.command = ProviderConfig::default().command;
        }
        if config.queue.default_limit == 0 {
            config.queue.default_limit = QueueConfig::default().default_limit;
        }
        if config.queue.default_sort.is_empty() {
            config.queue.default_sort = QueueConfig::default().default_sort;
        }
        Ok(config)
    }

    /// Default location of the user config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }
}

impl RepoConfig {
    /// Load `.revq.toml` from `repo_root`; defaults when absent.
    pub fn load(repo_root: &Path) -> Result<Self, ConfigError> {
        let path = repo_root.join(constants::CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let mut config: RepoConfig = load_toml(&path)?;
        if config.diff.max_files == 0 {
            config.diff.max_files = DiffConfig::default().max_files;
        }
        if config.diff.max_chunk_chars == 0 {
            config.diff.max_chunk_chars = DiffConfig::default().max_chunk_chars;
        }
        Ok(config)
    }
}

fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}
