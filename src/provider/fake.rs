//! Fixture-backed provider for tests and mock mode.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::models::ReviewPlan;

use super::{decode_plan, ProviderError, ReviewProvider};

/// Reads a canned plan document from disk instead of calling a model.
pub struct FixtureProvider {
    path: PathBuf,
}

impl FixtureProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReviewProvider for FixtureProvider {
    async fn run_review(
        &self,
        _prompt: &str,
        _schema_json: &str,
    ) -> Result<(ReviewPlan, String), ProviderError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::Fixture(format!("{}: {e}", self.path.display())))?;
        let plan = decode_plan(&raw)?;
        Ok((plan, raw))
    }

    async fn health_check(&self, _schema_json: &str) -> Result<(), ProviderError> {
        Ok(())
    }
}
