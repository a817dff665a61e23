//! Review posting via the GitHub REST API (`gh api`).

use serde::{Deserialize, Serialize};

use super::{Client, GithubError};
use crate::review::ReviewEvent;

/// One inline comment, addressed by diff position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub path: String,
    pub position: u32,
    pub body: String,
}

/// Payload for `POST /repos/{repo}/pulls/{number}/reviews`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReviewRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    pub event: ReviewEvent,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<ReviewComment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateReviewResponse {
    pub id: u64,
    pub html_url: String,
}

impl Client {
    /// Post a review; returns the created review's id/URL.
    pub async fn create_review(
        &self,
        repo: &str,
        number: u64,
        request: &CreateReviewRequest,
    ) -> Result<CreateReviewResponse, GithubError> {
        let endpoint = format!("repos/{repo}/pulls/{number}/reviews");
        let payload = serde_json::to_vec(request)?;
        let args = vec![
            "api".to_string(),
            "-X".to_string(),
            "POST".to_string(),
            endpoint,
            "--input".to_string(),
            "-".to_string(),
        ];
        let output = self.run(&args, Some(&payload)).await?;
        if output.is_empty() {
            return Ok(CreateReviewResponse::default());
        }
        Ok(serde_json::from_slice(&output)?)
    }
}
