//! Review body and inline comment composition.

use crate::github::ReviewComment;
use crate::models::Issue;

use super::resolve::IssuePosition;

/// Split resolved issues into inline comments and unmapped leftovers.
pub fn build_review_comments(positions: &[IssuePosition]) -> (Vec<ReviewComment>, Vec<Issue>) {
    let mut comments = Vec::new();
    let mut unmapped = Vec::new();
    for item in positions {
        if !item.mapped {
            unmapped.push(item.issue.clone());
            continue;
        }
        comments.push(ReviewComment {
            path: item.path.clone(),
            position: item.position,
            body: render_issue_comment_body(&item.issue),
        });
    }
    (comments, unmapped)
}

/// Assemble the review body.
///
/// The provider's draft body wins; a blank one falls back to the plan
/// summary. Unmapped issues are always appended so they stay visible to
/// the PR author.
pub fn build_review_body(base: &str, summary: &str, unmapped: &[Issue]) -> String {
    let mut body = base.trim().to_string();
    if body.is_empty() {
        body = summary.trim().to_string();
    }
    if unmapped.is_empty() {
        return body;
    }
    let mut out = String::new();
    if !body.is_empty() {
        out.push_str(&body);
        out.push_str("\n\n");
    }
    out.push_str("Additional notes (could not map to diff positions):\n");
    for issue in unmapped {
        out.push_str("- ");
        out.push_str(&render_issue_summary(issue));
        out.push('\n');
    }
    out.trim().to_string()
}

/// One-line rendering of an issue for lists and previews.
pub fn render_issue_summary(issue: &Issue) -> String {
    let mut loc = issue.file.clone();
    if issue.start_line > 0 {
        loc = format!("{}:{}", issue.file, issue.start_line);
    }
    if issue.end_line > 0 && issue.end_line != issue.start_line {
        loc = format!("{}:{}-{}", issue.file, issue.start_line, issue.end_line);
    }
    format!(
        "{loc} [{}/{}] {}",
        issue.severity, issue.category, issue.message
    )
}

/// Full inline-comment body for a mapped issue.
pub fn render_issue_comment_body(issue: &Issue) -> String {
    let mut body = format!("[{}/{}] {}", issue.severity, issue.category, issue.message);
    if let Some(patch) = issue
        .suggestion_patch
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        body.push_str("\n\nSuggested patch:\n```diff\n");
        body.push_str(patch);
        body.push_str("\n```\n");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(file: &str, message: &str) -> Issue {
        Issue {
            severity: "warning".into(),
            category: "style".into(),
            file: file.into(),
            start_line: 3,
            end_line: 3,
            message: message.into(),
            ..Issue::default()
        }
    }

    fn mapped(issue: Issue, position: u32) -> IssuePosition {
        IssuePosition {
            path: issue.file.clone(),
            line: issue.start_line,
            position,
            mapped: true,
            issue,
        }
    }

    fn unmapped(issue: Issue) -> IssuePosition {
        IssuePosition {
            path: issue.file.clone(),
            line: 0,
            position: 0,
            mapped: false,
            issue,
        }
    }

    #[test]
    fn mapped_issues_become_comments() {
        let (comments, leftovers) = build_review_comments(&[
            mapped(issue("a.rs", "first"), 2),
            unmapped(issue("gone.rs", "second")),
        ]);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].path, "a.rs");
        assert_eq!(comments[0].position, 2);
        assert!(comments[0].body.contains("[warning/style] first"));
        assert_eq!(leftovers.len(), 1);
        assert_eq!(leftovers[0].message, "second");
    }

    #[test]
    fn body_prefers_draft_over_summary() {
        assert_eq!(build_review_body("draft body", "summary", &[]), "draft body");
        assert_eq!(build_review_body("  ", "summary", &[]), "summary");
    }

    #[test]
    fn unmapped_issues_always_appended() {
        let body = build_review_body("base", "s", &[issue("gone.rs", "floating point drift")]);
        assert!(body.starts_with("base\n\n"));
        assert!(body.contains("Additional notes (could not map to diff positions):"));
        assert!(body.contains("- gone.rs:3 [warning/style] floating point drift"));
    }

    #[test]
    fn unmapped_section_present_even_without_base_body() {
        let body = build_review_body("", "", &[issue("gone.rs", "m")]);
        assert!(body.starts_with("Additional notes"));
    }

    #[test]
    fn summary_renders_line_ranges() {
        let mut i = issue("a.rs", "m");
        i.end_line = 5;
        assert_eq!(render_issue_summary(&i), "a.rs:3-5 [warning/style] m");
        i.start_line = 0;
        i.end_line = 0;
        assert_eq!(render_issue_summary(&i), "a.rs [warning/style] m");
    }

    #[test]
    fn comment_body_includes_fenced_suggestion() {
        let mut i = issue("a.rs", "m");
        i.suggestion_patch = Some("-old\n+new".into());
        let body = render_issue_comment_body(&i);
        assert!(body.contains("Suggested patch:\n```diff\n-old\n+new\n```"));
    }

    #[test]
    fn comment_body_skips_blank_suggestion() {
        let mut i = issue("a.rs", "m");
        i.suggestion_patch = Some("   ".into());
        let body = render_issue_comment_body(&i);
        assert!(!body.contains("Suggested patch"));
    }
}
