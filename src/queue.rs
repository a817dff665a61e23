//! Review queue assembly: search, filters, check summaries, sorting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

use crate::github::{CheckRunsResponse, Client, GithubError, PRFile, SearchPRItem};

/// One row of the review queue.
#[derive(Debug, Clone, Serialize)]
pub struct QueueItem {
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_draft: bool,
    pub labels: Vec<String>,
    pub age_days: i64,
    pub updated_days: i64,
    pub checks: CheckSummary,
    pub head_sha: String,
    pub size: u64,
}

/// Aggregate state of a PR's check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CheckSummary {
    Failure,
    Pending,
    Success,
    None,
    Unknown,
}

/// Queue sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, clap::ValueEnum)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QueueSort {
    Oldest,
    Updated,
    Ci,
    Size,
}

/// Check filter for `--checks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CheckFilter {
    Failure,
    Pending,
    Success,
    Any,
}

/// Draft filter for `--draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DraftFilter {
    True,
    False,
    Any,
}

/// Build the `gh search prs` query string from the queue filters.
pub fn build_queue_query(
    repo: Option<&str>,
    owner: Option<&str>,
    label: Option<&str>,
    draft: DraftFilter,
) -> String {
    let mut query = Vec::new();
    if let Some(repo) = repo {
        query.push(format!("repo:{repo}"));
    }
    if let Some(owner) = owner {
        query.push(format!("org:{owner}"));
    }
    if let Some(label) = label {
        query.push(format!("label:{label}"));
    }
    match draft {
        DraftFilter::True => query.push("draft:true".to_string()),
        DraftFilter::False => query.push("draft:false".to_string()),
        DraftFilter::Any => {}
    }
    query.join(" ")
}

/// Map a queue sort to the `gh search` sort/order pair.
pub fn map_sort(sort: QueueSort) -> (&'static str, &'static str) {
    match sort {
        QueueSort::Updated => ("updated", "asc"),
        QueueSort::Oldest | QueueSort::Ci | QueueSort::Size => ("created", "asc"),
    }
}

/// Convert search results into queue items, computing ages against `now`.
pub fn build_queue_items(items: &[SearchPRItem], now: DateTime<Utc>) -> Vec<QueueItem> {
    items
        .iter()
        .map(|item| {
            let created = parse_time(&item.created_at, now);
            let updated = parse_time(&item.updated_at, now);
            QueueItem {
                repo: item.repo.name_with_owner.clone(),
                number: item.number,
                title: item.title.clone(),
                url: item.url.clone(),
                author: item.author.login.clone(),
                created_at: item.created_at.clone(),
                updated_at: item.updated_at.clone(),
                is_draft: item.is_draft,
                labels: item.labels.iter().map(|l| l.name.clone()).collect(),
                age_days: (now - created).num_days(),
                updated_days: (now - updated).num_days(),
                checks: CheckSummary::Unknown,
                head_sha: String::new(),
                size: 0,
            }
        })
        .collect()
}

fn parse_time(value: &str, fallback: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(fallback)
}

/// Summarize a commit's check runs: any failure wins, then pending,
/// then success; no runs at all is its own state.
pub fn summarize_checks(response: &CheckRunsResponse) -> CheckSummary {
    if response.total == 0 {
        return CheckSummary::None;
    }
    let mut summary = CheckSummary::Success;
    for run in &response.runs {
        if matches!(run.conclusion.as_str(), "failure" | "cancelled" | "timed_out") {
            return CheckSummary::Failure;
        }
        if run.status != "completed" {
            summary = CheckSummary::Pending;
        }
    }
    summary
}

/// Fetch and attach check summaries for every queue item.
pub async fn apply_checks(client: &Client, queue: &mut [QueueItem]) -> Result<(), GithubError> {
    for item in queue.iter_mut() {
        if item.repo.is_empty() || item.number == 0 {
            continue;
        }
        if item.head_sha.is_empty() {
            let reference = crate::github::full_ref(&item.repo, item.number);
            let view = client.pr_view(&reference).await?;
            item.head_sha = view.head_ref_oid;
        }
        if item.head_sha.is_empty() {
            continue;
        }
        let response = client.check_runs(&item.repo, &item.head_sha).await?;
        item.checks = summarize_checks(&response);
    }
    Ok(())
}

/// Fetch and attach diff sizes (added + deleted lines) for sorting.
pub async fn apply_sizes(client: &Client, queue: &mut [QueueItem]) -> Result<(), GithubError> {
    for item in queue.iter_mut() {
        if item.repo.is_empty() || item.number == 0 {
            continue;
        }
        let reference = crate::github::full_ref(&item.repo, item.number);
        let view = client.pr_view(&reference).await?;
        item.size = sum_size(&view.files);
        if item.head_sha.is_empty() {
            item.head_sha = view.head_ref_oid;
        }
    }
    Ok(())
}

fn sum_size(files: &[PRFile]) -> u64 {
    files.iter().map(|f| f.additions + f.deletions).sum()
}

/// Drop items whose check summary does not match the filter.
pub fn filter_by_checks(queue: Vec<QueueItem>, filter: CheckFilter) -> Vec<QueueItem> {
    let wanted = match filter {
        CheckFilter::Any => return queue,
        CheckFilter::Failure => CheckSummary::Failure,
        CheckFilter::Pending => CheckSummary::Pending,
        CheckFilter::Success => CheckSummary::Success,
    };
    queue.into_iter().filter(|i| i.checks == wanted).collect()
}

/// Stable in-place sort by the chosen key.
pub fn sort_queue(queue: &mut [QueueItem], sort: QueueSort) {
    match sort {
        QueueSort::Updated => queue.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
        QueueSort::Ci => queue.sort_by_key(|i| i.checks.to_string()),
        QueueSort::Size => queue.sort_by(|a, b| b.size.cmp(&a.size)),
        QueueSort::Oldest => queue.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{CheckRun, Label, RepoRef, UserRef};

    fn search_item(number: u64, created: &str, updated: &str) -> SearchPRItem {
        SearchPRItem {
            number,
            title: format!("PR {number}"),
            url: format!("https://github.com/acme/app/pull/{number}"),
            created_at: created.to_string(),
            updated_at: updated.to_string(),
            is_draft: false,
            author: UserRef {
                login: "dev".to_string(),
            },
            labels: vec![Label {
                name: "bug".to_string(),
            }],
            repo: RepoRef {
                name_with_owner: "acme/app".to_string(),
            },
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-10T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn query_combines_filters() {
        let q = build_queue_query(Some("acme/app"), Some("acme"), Some("bug"), DraftFilter::False);
        assert_eq!(q, "repo:acme/app org:acme label:bug draft:false");
        assert_eq!(build_queue_query(None, None, None, DraftFilter::Any), "");
    }

    #[test]
    fn sort_maps_to_gh_arguments() {
        assert_eq!(map_sort(QueueSort::Updated), ("updated", "asc"));
        assert_eq!(map_sort(QueueSort::Oldest), ("created", "asc"));
        assert_eq!(map_sort(QueueSort::Ci), ("created", "asc"));
    }

    #[test]
    fn items_compute_ages_from_now() {
        let items = vec![search_item(1, "2025-06-01T00:00:00Z", "2025-06-09T00:00:00Z")];
        let queue = build_queue_items(&items, fixed_now());
        assert_eq!(queue[0].age_days, 9);
        assert_eq!(queue[0].updated_days, 1);
        assert_eq!(queue[0].labels, vec!["bug"]);
        assert_eq!(queue[0].checks, CheckSummary::Unknown);
    }

    #[test]
    fn unparseable_time_yields_zero_age() {
        let items = vec![search_item(1, "garbage", "garbage")];
        let queue = build_queue_items(&items, fixed_now());
        assert_eq!(queue[0].age_days, 0);
    }

    #[test]
    fn checks_summary_priorities() {
        let none = CheckRunsResponse { total: 0, runs: vec![] };
        assert_eq!(summarize_checks(&none), CheckSummary::None);

        let failing = CheckRunsResponse {
            total: 2,
            runs: vec![
                CheckRun {
                    status: "completed".into(),
                    conclusion: "success".into(),
                },
                CheckRun {
                    status: "completed".into(),
                    conclusion: "failure".into(),
                },
            ],
        };
        assert_eq!(summarize_checks(&failing), CheckSummary::Failure);

        let pending = CheckRunsResponse {
            total: 1,
            runs: vec![CheckRun {
                status: "in_progress".into(),
                conclusion: String::new(),
            }],
        };
        assert_eq!(summarize_checks(&pending), CheckSummary::Pending);

        let passing = CheckRunsResponse {
            total: 1,
            runs: vec![CheckRun {
                status: "completed".into(),
                conclusion: "success".into(),
            }],
        };
        assert_eq!(summarize_checks(&passing), CheckSummary::Success);
    }

    #[test]
    fn filter_keeps_matching_items_only() {
        let items = vec![
            search_item(1, "2025-06-01T00:00:00Z", "2025-06-01T00:00:00Z"),
            search_item(2, "2025-06-02T00:00:00Z", "2025-06-02T00:00:00Z"),
        ];
        let mut queue = build_queue_items(&items, fixed_now());
        queue[0].checks = CheckSummary::Failure;
        queue[1].checks = CheckSummary::Success;
        let filtered = filter_by_checks(queue, CheckFilter::Failure);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].number, 1);
    }

    #[test]
    fn sorts_by_age_updated_and_size() {
        let items = vec![
            search_item(1, "2025-06-05T00:00:00Z", "2025-06-01T00:00:00Z"),
            search_item(2, "2025-06-01T00:00:00Z", "2025-06-05T00:00:00Z"),
        ];
        let mut queue = build_queue_items(&items, fixed_now());

        sort_queue(&mut queue, QueueSort::Oldest);
        assert_eq!(queue[0].number, 2);

        sort_queue(&mut queue, QueueSort::Updated);
        assert_eq!(queue[0].number, 1);

        queue[0].size = 5;
        queue[1].size = 50;
        sort_queue(&mut queue, QueueSort::Size);
        assert_eq!(queue[0].size, 50);
    }
}
