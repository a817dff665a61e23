//! Review prompt assembly.
//!
//! A [`Snapshot`] of the PR is rendered into a template by plain
//! `{PLACEHOLDER}` substitution. The default template is compiled in;
//! config may point at a replacement file.

/// Built-in review prompt template.
pub const DEFAULT_TEMPLATE: &str = include_str!("code_reviewer.txt");

/// Everything the prompt template can reference about a PR.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub repo: String,
    pub pr_number: u64,
    pub title: String,
    pub description: String,
    pub base_sha: String,
    pub head_sha: String,
    pub ci_summary: String,
    pub test_results: String,
    pub file_list_stats: String,
    pub diff_chunks: String,
}

/// Render `template` with the given rules and snapshot.
pub fn render(template: &str, user_rules: &[String], repo_rules: &[String], snap: &Snapshot) -> String {
    template
        .replace("{USER_RULES}", &render_rules(user_rules))
        .replace("{REPO_RULES}", &render_rules(repo_rules))
        .replace("{REPO}", &snap.repo)
        .replace("{PR_NUMBER}", &snap.pr_number.to_string())
        .replace("{TITLE}", &snap.title)
        .replace("{DESCRIPTION}", &snap.description)
        .replace("{BASE_SHA}", &snap.base_sha)
        .replace("{HEAD_SHA}", &snap.head_sha)
        .replace("{CI_SUMMARY}", &snap.ci_summary)
        .replace("{TEST_RESULTS}", &snap.test_results)
        .replace("{FILE_LIST_WITH_STATS}", &snap.file_list_stats)
        .replace("{DIFF_CHUNKS}", &snap.diff_chunks)
}

fn render_rules(rules: &[String]) -> String {
    if rules.is_empty() {
        return "None".to_string();
    }
    rules
        .iter()
        .map(|rule| format!("- {rule}"))
        .collect::<Vec<_>>()
        .join("\n")
}
