//! App-wide constants.
//!
//! Centralises the tool name, config paths, and environment variable names
//! so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "revq";

/// Crate version, injected by cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (`.revq.toml` in the repo root).
pub const CONFIG_FILENAME: &str = ".revq.toml";

/// Directory name under `~/.config/` for the global config.
pub const CONFIG_DIR: &str = "revq";

/// Database filename under the data directory.
pub const DB_FILENAME: &str = "revq.db";


// ── Environment variable names (read once at startup) ───────────────

pub const ENV_DB_PATH: &str = "REVQ_DB_PATH";
pub const ENV_MOCK: &str = "REVQ_MOCK";
pub const ENV_MOCK_DIR: &str = "REVQ_MOCK_DIR";
pub const ENV_PROVIDER_FIXTURE: &str = "REVQ_PROVIDER_FIXTURE";
