//! Configuration loading and layering.
//!
//! Handles the global `~/.config/revq/config.toml`, the repo-local
//! `.revq.toml`, and default fallbacks.

pub mod loader;

pub use loader::{Config, ConfigError, DiffConfig, ProviderConfig, QueueConfig, RepoConfig};
