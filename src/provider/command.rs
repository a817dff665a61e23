//! Production provider: shells out to a structured-output CLI.
//!
//! The command (default `claude`) is invoked in print mode with a JSON
//! schema; its stdout is a wrapper object whose `structured_output`
//! field carries the schema-conforming plan.

use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::models::ReviewPlan;

use super::{decode_plan, ProviderError, ReviewProvider};

/// Command-backed review provider.
pub struct CommandProvider {
    command: String,
    args: Vec<String>,
}

impl CommandProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let command = if config.command.is_empty() {
            "claude".to_string()
        } else {
            config.command.clone()
        };
        Self {
            command,
            args: config.args.clone(),
        }
    }

    async fn invoke(&self, prompt: &str, schema_json: &str) -> Result<String, ProviderError> {
        let output = tokio::process::Command::new(&self.command)
            .args(&self.args)
            .args(["-p", "--output-format", "json", "--json-schema", schema_json])
            .arg(prompt)
            // No TTY inheritance; the provider must not prompt.
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ProviderError::Spawn(format!("{}: {e}", self.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Failed {
                detail: stderr.trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ReviewProvider for CommandProvider {
    async fn run_review(
        &self,
        prompt: &str,
        schema_json: &str,
    ) -> Result<(ReviewPlan, String), ProviderError> {
        let raw = self.invoke(prompt, schema_json).await?;
        let structured = extract_structured_output(&raw)?;
        let plan = decode_plan(&structured)?;
        Ok((plan, structured))
    }

    async fn health_check(&self, schema_json: &str) -> Result<(), ProviderError> {
        let raw = self
            .invoke("Return JSON matching the schema.", schema_json)
            .await?;
        let structured = extract_structured_output(&raw)?;
        decode_plan(&structured)?;
        Ok(())
    }
}

/// Wrapper shape of the provider CLI's JSON output.
#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    is_error: bool,
    #[serde(default)]
    structured_output: Option<serde_json::Value>,
}

/// Pull the schema-conforming document out of the CLI response wrapper.
fn extract_structured_output(raw: &str) -> Result<String, ProviderError> {
    let response: CommandResponse = serde_json::from_str(raw)
        .map_err(|e| ProviderError::ErrorResponse(format!("unparseable response wrapper: {e}")))?;
    if response.is_error {
        return Err(ProviderError::ErrorResponse(raw.trim().to_string()));
    }
    match response.structured_output {
        Some(value) if !value.is_null() => Ok(value.to_string()),
        _ => Err(ProviderError::MissingStructuredOutput),
    }
}
