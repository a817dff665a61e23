//! Human-readable previews of draft and submit operations.
//!
//! Every non-fatal anomaly (head drift, unknown decision, unmapped
//! issues) must be visible here before anything is posted.

use std::fmt::Write;

use crate::models::ReviewPlan;

use super::compose::render_issue_summary;
use super::resolve::IssuePosition;
use super::{decision_to_event, DraftPayload, ReviewEvent, UnknownDecision};

/// Preview shown (and persisted) when a draft is saved.
pub fn render_draft_preview(payload: &DraftPayload) -> String {
    let event = decision_to_event(&payload.plan.decision).unwrap_or(ReviewEvent::Comment);
    let mut b = String::new();
    let _ = writeln!(b, "PR: {}#{}", payload.repo, payload.number);
    let _ = writeln!(b, "Head SHA: {}", payload.head_sha);
    let _ = writeln!(b, "Event: {event}\n");
    b.push_str("Review body:\n");
    let mut body = payload.plan.draft_review_body.trim();
    if body.is_empty() {
        body = payload.plan.summary.trim();
    }
    b.push_str(body);
    b.push_str("\n\n");

    let issues = &payload.plan.issues;
    if issues.is_empty() {
        b.push_str("Inline comments: none\n");
        return b;
    }
    let _ = writeln!(b, "Inline comments ({}):", issues.len());
    for issue in issues {
        let _ = writeln!(b, "- {}", render_issue_summary(issue));
    }
    b
}

/// Preview shown before a submission.
#[allow(clippy::too_many_arguments)]
pub fn render_submit_preview(
    full_ref: &str,
    payload: &DraftPayload,
    current_head_sha: &str,
    event: ReviewEvent,
    body: &str,
    issue_positions: &[IssuePosition],
    dry_run: bool,
    unknown_decision: Option<&UnknownDecision>,
) -> String {
    let mut b = String::new();
    let _ = writeln!(b, "PR: {full_ref}");
    let draft_head = payload.head_sha.trim();
    if !draft_head.is_empty() {
        let _ = writeln!(b, "Draft head SHA: {draft_head}");
    }
    let current_head = current_head_sha.trim();
    if !current_head.is_empty() {
        let _ = writeln!(b, "Current head SHA: {current_head}");
    }
    if !draft_head.is_empty() && !current_head.is_empty() && draft_head != current_head {
        b.push_str(
            "WARNING: draft was generated for a different head SHA; inline comment mapping may be incomplete.\n",
        );
    }
    if unknown_decision.is_some() {
        let _ = writeln!(
            b,
            "WARNING: unknown decision {:?}; defaulting to COMMENT.",
            payload.plan.decision
        );
    }
    let _ = writeln!(b, "Event: {event}");
    if dry_run {
        b.push_str("DRY RUN: not posting to GitHub.\n");
    }

    b.push_str("\nReview body:\n");
    b.push_str(body.trim());
    b.push_str("\n\n");

    let mapped_count = issue_positions.iter().filter(|p| p.mapped).count();
    let _ = writeln!(
        b,
        "Inline comments: {mapped_count} mapped, {} unmapped",
        issue_positions.len() - mapped_count
    );
    for item in issue_positions {
        if item.mapped {
            let _ = writeln!(b, "- {}:{} => position {}", item.path, item.line, item.position);
        } else {
            let _ = writeln!(b, "- {} (unmapped)", render_issue_summary(&item.issue));
        }
    }
    b.push('\n');
    b
}

/// Plain or Markdown rendering of a full review plan (`review` command).
pub fn render_plan(plan: &ReviewPlan, markdown: bool) -> String {
    let mut b = String::new();
    let header = |b: &mut String, title: &str| {
        if markdown {
            let _ = writeln!(b, "## {title}");
        } else {
            let _ = writeln!(b, "{title}");
        }
    };

    header(&mut b, "Summary");
    let _ = writeln!(b, "{}", plan.summary);
    header(&mut b, "Risk and Decision");
    let _ = writeln!(b, "Risk: {}", plan.risk_level);
    let _ = writeln!(b, "Decision: {}", plan.decision);

    header(&mut b, "Key Changes");
    for change in &plan.key_changes {
        let _ = writeln!(b, "- {change}");
    }

    header(&mut b, "Issues");
    let mut by_file: indexmap::IndexMap<&str, Vec<&crate::models::Issue>> =
        indexmap::IndexMap::new();
    for issue in &plan.issues {
        by_file.entry(issue.file.as_str()).or_default().push(issue);
    }
    for (file, issues) in &by_file {
        let _ = writeln!(b, "{file}");
        for issue in issues {
            let _ = writeln!(
                b,
                "  - [{}/{}] {} ({}-{})",
                issue.severity, issue.category, issue.message, issue.start_line, issue.end_line
            );
            if let Some(patch) = issue.suggestion_patch.as_deref().filter(|p| !p.is_empty()) {
                b.push_str("    Suggested patch:\n");
                if markdown {
                    let _ = writeln!(b, "```diff\n{patch}\n```");
                } else {
                    let _ = writeln!(b, "{patch}");
                }
            }
        }
    }

    header(&mut b, "Questions");
    for q in &plan.questions {
        let _ = writeln!(b, "- {q}");
    }

    header(&mut b, "Praise");
    for p in &plan.praise {
        let _ = writeln!(b, "- {p}");
    }

    header(&mut b, "Draft Review Body");
    let _ = writeln!(b, "{}", plan.draft_review_body);
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Issue;

    fn payload(decision: &str, head: &str) -> DraftPayload {
        DraftPayload {
            repo: "acme/app".into(),
            number: 2,
            base_sha: "base1".into(),
            head_sha: head.into(),
            plan: ReviewPlan {
                summary: "A summary.".into(),
                decision: decision.into(),
                draft_review_body: "Body text.".into(),
                ..ReviewPlan::default()
            },
        }
    }

    fn positions() -> Vec<IssuePosition> {
        vec![
            IssuePosition {
                issue: Issue {
                    file: "a.rs".into(),
                    start_line: 3,
                    end_line: 3,
                    severity: "warning".into(),
                    category: "style".into(),
                    message: "m1".into(),
                    ..Issue::default()
                },
                path: "a.rs".into(),
                line: 3,
                position: 5,
                mapped: true,
            },
            IssuePosition {
                issue: Issue {
                    file: "gone.rs".into(),
                    start_line: 1,
                    end_line: 1,
                    severity: "info".into(),
                    category: "docs".into(),
                    message: "m2".into(),
                    ..Issue::default()
                },
                path: "gone.rs".into(),
                line: 0,
                position: 0,
                mapped: false,
            },
        ]
    }

    #[test]
    fn draft_preview_shows_event_and_issues() {
        let mut p = payload("approve", "head1");
        p.plan.issues = vec![Issue {
            file: "a.rs".into(),
            start_line: 3,
            end_line: 3,
            severity: "warning".into(),
            category: "style".into(),
            message: "m1".into(),
            ..Issue::default()
        }];
        let preview = render_draft_preview(&p);
        assert!(preview.contains("PR: acme/app#2"));
        assert!(preview.contains("Event: APPROVE"));
        assert!(preview.contains("Inline comments (1):"));
        assert!(preview.contains("a.rs:3 [warning/style] m1"));
    }

    #[test]
    fn draft_preview_without_issues_says_none() {
        let preview = render_draft_preview(&payload("comment", "head1"));
        assert!(preview.contains("Inline comments: none"));
    }

    #[test]
    fn submit_preview_warns_on_drift() {
        let preview = render_submit_preview(
            "acme/app#2",
            &payload("comment", "old-head"),
            "new-head",
            ReviewEvent::Comment,
            "body",
            &[],
            false,
            None,
        );
        assert!(preview.contains("Draft head SHA: old-head"));
        assert!(preview.contains("Current head SHA: new-head"));
        assert!(preview.contains("WARNING: draft was generated for a different head SHA"));
    }

    #[test]
    fn submit_preview_no_drift_warning_when_heads_match() {
        let preview = render_submit_preview(
            "acme/app#2",
            &payload("comment", "head1"),
            "head1",
            ReviewEvent::Comment,
            "body",
            &[],
            false,
            None,
        );
        assert!(!preview.contains("different head SHA"));
    }

    #[test]
    fn submit_preview_reports_unknown_decision_and_dry_run() {
        let unknown = UnknownDecision("ship it".into());
        let preview = render_submit_preview(
            "acme/app#2",
            &payload("ship it", "head1"),
            "head1",
            ReviewEvent::Comment,
            "body",
            &[],
            true,
            Some(&unknown),
        );
        assert!(preview.contains("WARNING: unknown decision \"ship it\""));
        assert!(preview.contains("DRY RUN: not posting to GitHub."));
    }

    #[test]
    fn submit_preview_counts_and_lists_mappings() {
        let preview = render_submit_preview(
            "acme/app#2",
            &payload("comment", "head1"),
            "head1",
            ReviewEvent::Comment,
            "body",
            &positions(),
            false,
            None,
        );
        assert!(preview.contains("Inline comments: 1 mapped, 1 unmapped"));
        assert!(preview.contains("- a.rs:3 => position 5"));
        assert!(preview.contains("- gone.rs:1 [info/docs] m2 (unmapped)"));
    }

    #[test]
    fn plan_rendering_groups_issues_by_file() {
        let plan = ReviewPlan {
            summary: "s".into(),
            risk_level: "low".into(),
            decision: "comment".into(),
            issues: vec![
                Issue {
                    file: "a.rs".into(),
                    message: "one".into(),
                    ..Issue::default()
                },
                Issue {
                    file: "b.rs".into(),
                    message: "two".into(),
                    ..Issue::default()
                },
                Issue {
                    file: "a.rs".into(),
                    message: "three".into(),
                    ..Issue::default()
                },
            ],
            ..ReviewPlan::default()
        };
        let text = render_plan(&plan, false);
        let a_idx = text.find("a.rs").unwrap();
        let b_idx = text.find("b.rs").unwrap();
        assert!(a_idx < b_idx);
        assert!(text.contains("one"));
        assert!(text.contains("three"));

        let md = render_plan(&plan, true);
        assert!(md.contains("## Summary"));
    }
}
