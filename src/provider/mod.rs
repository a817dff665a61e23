//! ReviewProvider trait and implementations.
//!
//! The provider turns a prompt plus a JSON schema into a [`ReviewPlan`].
//! Production shells out to an external CLI; tests and mock mode read a
//! canned plan from disk. Core review logic never knows which one is
//! active.

pub mod command;
pub mod fake;

pub use command::CommandProvider;
pub use fake::FixtureProvider;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ReviewPlan;

/// Errors from the review provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("failed to run provider command: {0}")]
    Spawn(String),

    #[error("provider failed: {detail}")]
    Failed { detail: String },

    #[error("provider returned an error response: {0}")]
    ErrorResponse(String),

    #[error("provider response missing structured output")]
    MissingStructuredOutput,

    #[error("provider output failed schema validation: {0}")]
    SchemaViolation(String),

    #[error("failed to read provider fixture: {0}")]
    Fixture(String),
}

/// AI review generation.
#[async_trait]
pub trait ReviewProvider: Send + Sync {
    /// Generate a review plan for `prompt`, constrained by `schema_json`.
    ///
    /// Returns the decoded plan and the raw JSON document it was decoded
    /// from. A document that does not satisfy the schema is a hard error.
    async fn run_review(
        &self,
        prompt: &str,
        schema_json: &str,
    ) -> Result<(ReviewPlan, String), ProviderError>;

    /// Cheap round-trip to verify the provider is callable.
    async fn health_check(&self, schema_json: &str) -> Result<(), ProviderError>;
}

/// Strictly decode a plan document.
///
/// Unknown fields, missing required fields, and mistyped values all
/// fail: this is the schema-conformance gate for provider output.
pub fn decode_plan(raw: &str) -> Result<ReviewPlan, ProviderError> {
    serde_json::from_str(raw).map_err(|e| ProviderError::SchemaViolation(e.to_string()))
}
