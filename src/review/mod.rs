//! Review assembly: resolving issues onto diff positions, composing the
//! posted review, and rendering previews.

pub mod compose;
pub mod preview;
pub mod resolve;

pub use compose::{build_review_body, build_review_comments};
pub use resolve::{map_issues_to_positions, IssuePosition};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::models::ReviewPlan;

/// Review disposition accepted by the GitHub review API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    Approve,
    Comment,
    RequestChanges,
}

/// A plan decision that matches none of the known dispositions.
///
/// Not fatal: callers post a plain comment and surface the original
/// value in the preview.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown decision {0:?}")]
pub struct UnknownDecision(pub String);

/// Map a plan's free-form decision field to a review event.
///
/// Trimmed, case-insensitive. An empty decision is a plain comment; an
/// unrecognised one is reported so the caller can warn before defaulting
/// to [`ReviewEvent::Comment`].
pub fn decision_to_event(decision: &str) -> Result<ReviewEvent, UnknownDecision> {
    match decision.trim().to_lowercase().as_str() {
        "approve" => Ok(ReviewEvent::Approve),
        "request_changes" => Ok(ReviewEvent::RequestChanges),
        "comment" | "" => Ok(ReviewEvent::Comment),
        _ => Err(UnknownDecision(decision.to_string())),
    }
}

/// The JSON document persisted for a draft review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPayload {
    pub repo: String,
    pub number: u64,
    pub base_sha: String,
    pub head_sha: String,
    pub plan: ReviewPlan,
}
