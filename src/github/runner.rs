//! Command runners behind the GitHub client.
//!
//! Production traffic goes through the `gh` CLI; tests and mock mode use
//! a fixture directory with canned responses.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::GithubError;

/// Executes a `gh` invocation and returns its output.
#[async_trait]
pub trait GhRunner: Send + Sync {
    async fn run(&self, args: &[String], stdin: Option<&[u8]>) -> Result<Vec<u8>, GithubError>;
}

/// Spawns the real `gh` binary via `tokio::process`.
pub struct ExecRunner;

#[async_trait]
impl GhRunner for ExecRunner {
    async fn run(&self, args: &[String], stdin: Option<&[u8]>) -> Result<Vec<u8>, GithubError> {
        let mut cmd = tokio::process::Command::new("gh");
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| GithubError::Spawn(format!("failed to run gh: {e}")))?;

        if let Some(input) = stdin {
            if let Some(mut handle) = child.stdin.take() {
                handle
                    .write_all(input)
                    .await
                    .map_err(|e| GithubError::Spawn(format!("failed to write gh stdin: {e}")))?;
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| GithubError::Spawn(format!("failed to wait for gh: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GithubError::CommandFailed {
                args: args.join(" "),
                detail: stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Serves canned `gh` responses from a fixture directory.
///
/// Fixture files, matched on the argument list:
/// - `queue.json` for `search prs`
/// - `pr_view.json` for `pr view`
/// - `pr_diff.txt` for `pr diff`
/// - `check_runs.json` for `check-runs` API calls
/// - `create_review.json` for review-posting API calls
pub struct FixtureRunner {
    root: PathBuf,
}

impl FixtureRunner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl GhRunner for FixtureRunner {
    async fn run(&self, args: &[String], _stdin: Option<&[u8]>) -> Result<Vec<u8>, GithubError> {
        let key = args.join(" ");
        let file = if key.contains("search prs") {
            "queue.json"
        } else if key.contains("pr view") {
            "pr_view.json"
        } else if key.contains("pr diff") {
            "pr_diff.txt"
        } else if key.contains("check-runs") {
            "check_runs.json"
        } else if key.contains("reviews") {
            "create_review.json"
        } else if key.contains("auth status") {
            return Ok(b"logged in".to_vec());
        } else {
            return Err(GithubError::NoFixture(key));
        };
        let path = self.root.join(file);
        tokio::fs::read(&path)
            .await
            .map_err(|e| GithubError::Spawn(format!("failed to read fixture {}: {e}", path.display())))
    }
}
