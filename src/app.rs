//! Application wiring.
//!
//! Everything ambient — environment variables, config files, collaborator
//! selection — is resolved exactly once into [`AppOptions`] and then an
//! [`App`]. Core modules receive the result by reference and never look
//! anything up themselves.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{Config, ConfigError, RepoConfig};
use crate::constants;
use crate::env::Env;
use crate::github::{Client, ExecRunner, FixtureRunner};
use crate::provider::{CommandProvider, FixtureProvider, ReviewProvider};
use crate::store::{Store, StoreError};

/// Errors during startup.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open local store: {0}")]
    Store(#[from] StoreError),

    #[error("could not determine a data directory for the local store")]
    NoDataDir,
}

/// Mock-mode collaborator selection.
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Directory of canned `gh` responses.
    pub fixtures_dir: PathBuf,
    /// Canned review plan document.
    pub provider_fixture: PathBuf,
}

/// Explicit startup options, resolved once from flags and environment.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// `--config` override for the user config file.
    pub config_path: Option<PathBuf>,
    /// Database location override.
    pub db_path: Option<PathBuf>,
    /// When set, fixture-backed collaborators replace the real ones.
    pub mock: Option<MockOptions>,
}

impl AppOptions {
    /// Read the environment-driven options.
    pub fn from_env(env: &Env) -> Self {
        let mock = match env.get_nonempty(constants::ENV_MOCK).as_deref() {
            Some("1") => Some(MockOptions {
                fixtures_dir: env
                    .get_nonempty(constants::ENV_MOCK_DIR)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("testdata/gh")),
                provider_fixture: env
                    .get_nonempty(constants::ENV_PROVIDER_FIXTURE)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("testdata/provider/review.json")),
            }),
            _ => None,
        };
        Self {
            config_path: None,
            db_path: env.get_nonempty(constants::ENV_DB_PATH).map(PathBuf::from),
            mock,
        }
    }
}

/// Shared handles for one invocation.
pub struct App {
    pub config: Config,
    pub repo_config: RepoConfig,
    pub gh: Client,
    pub provider: Arc<dyn ReviewProvider>,
    pub store: Store,
}

impl App {
    /// Build the application from resolved options.
    pub fn init(options: &AppOptions) -> Result<Self, AppError> {
        let config = Config::load(options.config_path.as_deref())?;
        let repo_config = RepoConfig::load(std::path::Path::new("."))?;

        let (gh, provider): (Client, Arc<dyn ReviewProvider>) = match &options.mock {
            Some(mock) => (
                Client::new(Box::new(FixtureRunner::new(&mock.fixtures_dir))),
                Arc::new(FixtureProvider::new(&mock.provider_fixture)),
            ),
            None => (
                Client::new(Box::new(ExecRunner)),
                Arc::new(CommandProvider::new(&config.provider)),
            ),
        };

        let db_path = match &options.db_path {
            Some(path) => path.clone(),
            None => default_db_path().ok_or(AppError::NoDataDir)?,
        };
        let store = Store::open(&db_path)?;

        Ok(Self {
            config,
            repo_config,
            gh,
            provider,
            store,
        })
    }
}

/// `~/.local/share/revq/revq.db`, falling back to `~/.revq/revq.db`.
fn default_db_path() -> Option<PathBuf> {
    if let Some(data) = dirs::data_dir() {
        return Some(data.join(constants::CONFIG_DIR).join(constants::DB_FILENAME));
    }
    dirs::home_dir().map(|home| {
        home.join(format!(".{}", constants::CONFIG_DIR))
            .join(constants::DB_FILENAME)
    })
}
