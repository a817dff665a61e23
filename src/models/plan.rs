//! Review plan types produced by the AI provider.
//!
//! The provider is asked for JSON matching the schema generated from
//! [`ReviewPlan`]; decoding is strict (`deny_unknown_fields`), so a
//! document that drifts from the schema fails to decode rather than being
//! silently accepted with holes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A structured review plan returned by the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReviewPlan {
    /// One-paragraph summary of the change.
    pub summary: String,
    /// Overall risk assessment (free-form, e.g. "low", "medium", "high").
    pub risk_level: String,
    /// Suggested review disposition: "approve", "comment", or
    /// "request_changes". Treated as untrusted; unknown values fall back
    /// to a plain comment.
    pub decision: String,
    /// Notable changes, one per entry.
    pub key_changes: Vec<String>,
    /// Concrete findings with file/line references.
    pub issues: Vec<Issue>,
    /// Open questions for the author.
    pub questions: Vec<String>,
    /// Things done well.
    pub praise: Vec<String>,
    /// Ready-to-post review body. May be empty; callers fall back to
    /// `summary`.
    pub draft_review_body: String,
}

/// A single finding reported by the provider.
///
/// File paths and line numbers are approximate input: paths may carry
/// `./`, `a/`, or `b/` prefixes and lines may be zero or outside the
/// diff. Resolution against the diff happens in `review::resolve`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Issue {
    /// Severity label (e.g. "error", "warning", "info").
    pub severity: String,
    /// Category label (e.g. "correctness", "style").
    pub category: String,
    /// File path as reported, prefixes and all.
    pub file: String,
    /// First line of the reported range (1-based; 0 = unknown).
    pub start_line: u32,
    /// Last line of the reported range (1-based; 0 = unknown).
    pub end_line: u32,
    /// Explanation of the issue.
    pub message: String,
    /// Optional replacement hunk in unified diff format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_patch: Option<String>,
    /// Optional confidence score in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Serialize the JSON Schema the provider is asked to conform to.
pub fn plan_schema_json() -> String {
    let schema = schemars::schema_for!(ReviewPlan);
    serde_json::to_string(&schema).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_PLAN: &str = r#"{
        "summary": "Adds a retry loop",
        "risk_level": "low",
        "decision": "comment",
        "key_changes": ["retry on 503"],
        "issues": [
            {
                "severity": "warning",
                "category": "correctness",
                "file": "src/client.rs",
                "start_line": 12,
                "end_line": 14,
                "message": "retry count is unbounded"
            }
        ],
        "questions": [],
        "praise": ["clean tests"],
        "draft_review_body": "Looks reasonable overall."
    }"#;

    #[test]
    fn decode_valid_plan() {
        let plan: ReviewPlan = serde_json::from_str(VALID_PLAN).unwrap();
        assert_eq!(plan.decision, "comment");
        assert_eq!(plan.issues.len(), 1);
        assert_eq!(plan.issues[0].start_line, 12);
        assert!(plan.issues[0].suggestion_patch.is_none());
    }

    #[test]
    fn decode_rejects_unknown_fields() {
        let doc = r#"{
            "summary": "s", "risk_level": "low", "decision": "comment",
            "key_changes": [], "issues": [], "questions": [], "praise": [],
            "draft_review_body": "", "surprise": true
        }"#;
        assert!(serde_json::from_str::<ReviewPlan>(doc).is_err());
    }

    #[test]
    fn decode_rejects_missing_required_fields() {
        let doc = r#"{"summary": "s"}"#;
        assert!(serde_json::from_str::<ReviewPlan>(doc).is_err());
    }

    #[test]
    fn decode_rejects_negative_lines() {
        let doc = r#"{
            "summary": "s", "risk_level": "low", "decision": "comment",
            "key_changes": [],
            "issues": [{
                "severity": "info", "category": "style", "file": "a.rs",
                "start_line": -1, "end_line": 0, "message": "m"
            }],
            "questions": [], "praise": [], "draft_review_body": ""
        }"#;
        assert!(serde_json::from_str::<ReviewPlan>(doc).is_err());
    }

    #[test]
    fn issue_roundtrip_omits_empty_optionals() {
        let issue = Issue {
            severity: "info".into(),
            category: "style".into(),
            file: "a.rs".into(),
            start_line: 1,
            end_line: 1,
            message: "m".into(),
            suggestion_patch: None,
            confidence: None,
        };
        let json = serde_json::to_string(&issue).unwrap();
        assert!(!json.contains("suggestion_patch"));
        assert!(!json.contains("confidence"));
    }

    #[test]
    fn schema_names_required_fields() {
        let schema = plan_schema_json();
        assert!(schema.contains("draft_review_body"));
        assert!(schema.contains("start_line"));
    }
}
