//! GitHub access through the `gh` CLI.
//!
//! The client never speaks HTTP itself; every operation is a `gh`
//! invocation behind the [`GhRunner`] trait so tests and mock mode can
//! substitute canned responses.

pub mod review;
pub mod runner;

pub use review::{CreateReviewRequest, CreateReviewResponse, ReviewComment};
pub use runner::{ExecRunner, FixtureRunner, GhRunner};

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the GitHub client.
#[derive(Error, Debug)]
pub enum GithubError {
    #[error("{0}")]
    Spawn(String),

    #[error("gh {args} failed: {detail}")]
    CommandFailed { args: String, detail: String },

    #[error("failed to decode gh output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid PR reference {0:?}; expected OWNER/REPO#123 or a PR URL")]
    InvalidPrRef(String),

    #[error("no fixture for gh args: {0}")]
    NoFixture(String),
}

/// A pull request as returned by `gh pr view`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PRView {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub url: String,
    pub author: UserRef,
    pub labels: Vec<Label>,
    #[serde(rename = "baseRefOid")]
    pub base_ref_oid: String,
    #[serde(rename = "headRefOid")]
    pub head_ref_oid: String,
    pub files: Vec<PRFile>,
    #[serde(rename = "headRepository")]
    pub repository: RepoRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PRFile {
    pub path: String,
    pub additions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepoRef {
    #[serde(rename = "nameWithOwner")]
    pub name_with_owner: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Label {
    pub name: String,
}

/// A PR from `gh search prs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchPRItem {
    pub number: u64,
    pub title: String,
    pub url: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    #[serde(rename = "isDraft")]
    pub is_draft: bool,
    pub author: UserRef,
    pub labels: Vec<Label>,
    #[serde(rename = "repository")]
    pub repo: RepoRef,
}

/// Check-run listing for a commit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckRunsResponse {
    pub total: u64,
    #[serde(rename = "check_runs")]
    pub runs: Vec<CheckRun>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckRun {
    pub status: String,
    pub conclusion: String,
}

static PR_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^/]+/[^#]+)#([0-9]+)$").unwrap());

/// Parse `OWNER/REPO#123` or a PR URL into `(repo, number)`.
pub fn parse_pr(reference: &str) -> Result<(String, u64), GithubError> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        let path = reference
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(reference);
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        // host / owner / repo / pull / number
        if parts.len() < 5 || parts[3] != "pull" {
            return Err(GithubError::InvalidPrRef(reference.to_string()));
        }
        let number = parts[4]
            .parse()
            .map_err(|_| GithubError::InvalidPrRef(reference.to_string()))?;
        return Ok((format!("{}/{}", parts[1], parts[2]), number));
    }

    let caps = PR_REF_RE
        .captures(reference)
        .ok_or_else(|| GithubError::InvalidPrRef(reference.to_string()))?;
    let number = caps[2]
        .parse()
        .map_err(|_| GithubError::InvalidPrRef(reference.to_string()))?;
    Ok((caps[1].to_string(), number))
}

/// Canonical `OWNER/REPO#123` form of a PR reference.
pub fn full_ref(repo: &str, number: u64) -> String {
    format!("{repo}#{number}")
}

/// GitHub client over a [`GhRunner`].
pub struct Client {
    runner: Box<dyn GhRunner>,
}

impl Client {
    pub fn new(runner: Box<dyn GhRunner>) -> Self {
        Self { runner }
    }

    pub(crate) async fn run(
        &self,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<Vec<u8>, GithubError> {
        self.runner.run(args, stdin).await
    }

    /// Verify `gh` itself can be spawned.
    pub async fn check_installed(&self) -> Result<(), GithubError> {
        tokio::process::Command::new("gh")
            .arg("--version")
            .output()
            .await
            .map_err(|_| GithubError::Spawn("gh CLI not found in PATH".to_string()))?;
        Ok(())
    }

    /// Verify the `gh` session is authenticated.
    pub async fn auth_status(&self) -> Result<(), GithubError> {
        self.run(&to_args(&["auth", "status"]), None).await?;
        Ok(())
    }

    /// Search open PRs where the viewer's review is requested.
    pub async fn search_prs(
        &self,
        query: &str,
        limit: usize,
        sort: &str,
        order: &str,
    ) -> Result<Vec<SearchPRItem>, GithubError> {
        let mut args = to_args(&[
            "search",
            "prs",
            "--state",
            "open",
            "--review-requested=@me",
            "--limit",
        ]);
        args.push(limit.to_string());
        args.extend(to_args(&["--sort", sort, "--order", order, "--json"]));
        args.push("number,title,url,repository,author,createdAt,updatedAt,isDraft,labels".to_string());
        if !query.trim().is_empty() {
            args.push(query.to_string());
        }
        let output = self.run(&args, None).await?;
        Ok(serde_json::from_slice(&output)?)
    }

    /// Fetch the structured view of a PR.
    pub async fn pr_view(&self, reference: &str) -> Result<PRView, GithubError> {
        let mut args = to_args(&["pr", "view"]);
        args.extend(pr_ref_args(reference));
        args.extend(to_args(&["--json"]));
        args.push(
            "number,title,body,url,author,labels,baseRefOid,headRefOid,files,headRepository"
                .to_string(),
        );
        let output = self.run(&args, None).await?;
        Ok(serde_json::from_slice(&output)?)
    }

    /// Fetch the raw unified diff of a PR.
    pub async fn pr_diff(&self, reference: &str) -> Result<String, GithubError> {
        let mut args = to_args(&["pr", "diff"]);
        args.extend(pr_ref_args(reference));
        let output = self.run(&args, None).await?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// List check runs for a commit.
    pub async fn check_runs(
        &self,
        repo: &str,
        sha: &str,
    ) -> Result<CheckRunsResponse, GithubError> {
        let args = vec![
            "api".to_string(),
            format!("repos/{repo}/commits/{sha}/check-runs"),
        ];
        let output = self.run(&args, None).await?;
        Ok(serde_json::from_slice(&output)?)
    }
}

/// Convert a PR reference into `gh` positional args.
///
/// `OWNER/REPO#123` becomes `-R OWNER/REPO 123`; anything else (URLs,
/// bare numbers) is passed through for `gh` to interpret.
fn pr_ref_args(reference: &str) -> Vec<String> {
    match parse_pr(reference) {
        Ok((repo, number)) if !repo.is_empty() => {
            vec!["-R".to_string(), repo, number.to_string()]
        }
        _ => vec![reference.to_string()],
    }
}

fn to_args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pr_short_form() {
        let (repo, number) = parse_pr("acme/app#42").unwrap();
        assert_eq!(repo, "acme/app");
        assert_eq!(number, 42);
    }

    #[test]
    fn parse_pr_url_form() {
        let (repo, number) = parse_pr("https://github.com/acme/app/pull/7").unwrap();
        assert_eq!(repo, "acme/app");
        assert_eq!(number, 7);
    }

    #[test]
    fn parse_pr_url_with_trailing_segment() {
        let (repo, number) = parse_pr("https://github.com/acme/app/pull/7/files").unwrap();
        assert_eq!(repo, "acme/app");
        assert_eq!(number, 7);
    }

    #[test]
    fn parse_pr_rejects_garbage() {
        assert!(parse_pr("not-a-ref").is_err());
        assert!(parse_pr("acme/app#notanumber").is_err());
        assert!(parse_pr("https://github.com/acme/app/issues/7").is_err());
    }

    #[test]
    fn full_ref_formats() {
        assert_eq!(full_ref("acme/app", 3), "acme/app#3");
    }

    #[test]
    fn pr_ref_args_expands_short_form() {
        assert_eq!(pr_ref_args("acme/app#3"), vec!["-R", "acme/app", "3"]);
    }

    #[test]
    fn pr_ref_args_passes_through_other_refs() {
        assert_eq!(pr_ref_args("123"), vec!["123"]);
    }

    #[test]
    fn pr_view_decodes_gh_shape() {
        let doc = r#"{
            "number": 5,
            "title": "T",
            "body": "B",
            "url": "https://github.com/acme/app/pull/5",
            "author": {"login": "dev"},
            "labels": [{"name": "bug"}],
            "baseRefOid": "base1",
            "headRefOid": "head1",
            "files": [{"path": "src/a.rs", "additions": 3, "deletions": 1}],
            "headRepository": {"nameWithOwner": "acme/app"}
        }"#;
        let view: PRView = serde_json::from_str(doc).unwrap();
        assert_eq!(view.number, 5);
        assert_eq!(view.head_ref_oid, "head1");
        assert_eq!(view.repository.name_with_owner, "acme/app");
        assert_eq!(view.files[0].path, "src/a.rs");
    }

    #[test]
    fn pr_view_tolerates_missing_fields() {
        let view: PRView = serde_json::from_str(r#"{"number": 1}"#).unwrap();
        assert_eq!(view.number, 1);
        assert!(view.files.is_empty());
        assert!(view.head_ref_oid.is_empty());
    }

    #[tokio::test]
    async fn client_pr_view_via_fixture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pr_view.json"),
            r#"{"number": 9, "headRefOid": "abc"}"#,
        )
        .unwrap();
        let client = Client::new(Box::new(FixtureRunner::new(dir.path())));
        let view = client.pr_view("acme/app#9").await.unwrap();
        assert_eq!(view.number, 9);
        assert_eq!(view.head_ref_oid, "abc");
    }
}
