//! Issue-to-position resolution.
//!
//! Provider-reported file paths and line numbers are approximate; this
//! module finds the best diff position for each issue or marks it
//! unmapped. Unmapped issues are never dropped — they end up in the
//! review body instead of as inline comments.

use crate::diff::PositionMap;
use crate::models::Issue;

/// The resolution result for one issue.
#[derive(Debug, Clone)]
pub struct IssuePosition {
    pub issue: Issue,
    /// Resolved path, or the raw reported path when unmapped.
    pub path: String,
    /// Resolved new-file line (0 when unmapped).
    pub line: u32,
    /// Diff position for the review API (0 when unmapped).
    pub position: u32,
    pub mapped: bool,
}

/// Resolve every issue against the position map.
///
/// One output per input, same order; mapping failures are explicit
/// outcomes, not errors.
pub fn map_issues_to_positions(position_map: &PositionMap, issues: &[Issue]) -> Vec<IssuePosition> {
    issues
        .iter()
        .map(|issue| position_for_issue(position_map, issue))
        .collect()
}

/// Resolve a single issue.
///
/// Path candidates are tried in priority order: the literal string, then
/// with a `./` prefix stripped, then with an `a/` or `b/` prefix
/// stripped. For each candidate the start line is preferred; the end
/// line is a fallback for ranges whose start fell outside the diff's
/// new-file numbering.
fn position_for_issue(position_map: &PositionMap, issue: &Issue) -> IssuePosition {
    let unmapped = |issue: &Issue| IssuePosition {
        issue: issue.clone(),
        path: issue.file.trim().to_string(),
        line: 0,
        position: 0,
        mapped: false,
    };

    let file = issue.file.trim();
    if file.is_empty() {
        let mut result = unmapped(issue);
        result.path = String::new();
        return result;
    }

    let mut candidates = vec![file];
    if let Some(stripped) = file.strip_prefix("./") {
        candidates.push(stripped);
    }
    if file.starts_with("a/") || file.starts_with("b/") {
        candidates.push(&file[2..]);
    }

    for candidate in candidates {
        if issue.start_line > 0 {
            if let Some(position) = position_map.position_for_new_line(candidate, issue.start_line)
            {
                return IssuePosition {
                    issue: issue.clone(),
                    path: candidate.to_string(),
                    line: issue.start_line,
                    position,
                    mapped: true,
                };
            }
        }
        if issue.end_line > 0 && issue.end_line != issue.start_line {
            if let Some(position) = position_map.position_for_new_line(candidate, issue.end_line) {
                return IssuePosition {
                    issue: issue.clone(),
                    path: candidate.to_string(),
                    line: issue.end_line,
                    position,
                    mapped: true,
                };
            }
        }
    }

    unmapped(issue)
}
