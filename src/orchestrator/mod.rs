//! End-to-end flows: plan generation, draft saving, and submission.
//!
//! The orchestrator owns sequencing and state transitions; rendering
//! and prompting are delegated so it stays UI-free. External calls
//! happen strictly before local store mutations — cancelling an
//! in-flight call leaves the store untouched.

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::app::App;
use crate::diff::{build_position_map, chunker, parse_unified, DiffError};
use crate::github::{
    parse_pr, CreateReviewRequest, CreateReviewResponse, GithubError, PRFile, PRView,
};
use crate::models::plan::plan_schema_json;
use crate::models::ReviewPlan;
use crate::prompt;
use crate::provider::ProviderError;
use crate::redact;
use crate::review::preview::{render_draft_preview, render_submit_preview};
use crate::review::{
    build_review_body, build_review_comments, decision_to_event, map_issues_to_positions,
    DraftPayload, ReviewEvent, UnknownDecision,
};
use crate::store::StoreError;

/// Errors while generating a review plan.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Github(#[from] GithubError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error("review generation failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("failed to read prompt template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors while saving a draft.
#[derive(Error, Debug)]
pub enum DraftError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode draft payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors during submission.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Github(#[from] GithubError),

    #[error("no saved draft for {full_ref}; run `revq draft {full_ref}` or `revq review {full_ref}` first")]
    NoDraft { full_ref: String },

    #[error("failed to decode saved draft payload: {0}")]
    CorruptDraft(#[from] serde_json::Error),

    #[error("invalid --event value {0:?}; must be one of: approve, comment, request_changes")]
    InvalidEventOverride(String),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The product of one generation run.
pub struct ReviewRun {
    pub full_ref: String,
    pub view: PRView,
    pub plan: ReviewPlan,
    pub raw: String,
    pub diff_text: String,
}

/// Generate a review plan for `pr_ref` without touching the store.
pub async fn generate(
    app: &App,
    pr_ref: &str,
    max_issues: usize,
) -> Result<ReviewRun, GenerateError> {
    let (repo, number) = parse_pr(pr_ref)?;
    let full_ref = crate::github::full_ref(&repo, number);

    let view = app.gh.pr_view(&full_ref).await?;
    let diff_text = app.gh.pr_diff(&full_ref).await?;

    let files = parse_unified(&diff_text);
    let chunks = chunker::build_chunks(
        &files,
        &app.repo_config.diff.ignore,
        app.repo_config.diff.max_files,
        app.repo_config.diff.max_chunk_chars,
    )?;
    let file_list = render_file_list(&view.files);
    let diff_chunks = chunks.join("\n\n");

    let redacting = app.config.redaction.enabled;
    let snapshot = prompt::Snapshot {
        repo: view.repository.name_with_owner.clone(),
        pr_number: view.number,
        title: redact::redact_optional(&view.title, redacting),
        description: redact::redact_optional(&view.body, redacting),
        base_sha: view.base_ref_oid.clone(),
        head_sha: view.head_ref_oid.clone(),
        ci_summary: "Not fetched".to_string(),
        test_results: "Not run".to_string(),
        file_list_stats: redact::redact_optional(&file_list, redacting),
        diff_chunks: redact::redact_optional(&diff_chunks, redacting),
    };
    let user_rules = redact::redact_rule_list(&app.config.user_rules, redacting);
    let repo_rules = redact::redact_rule_list(&app.repo_config.repo_rules, redacting);

    let template = load_template(app)?;
    let prompt_text = prompt::render(&template, &user_rules, &repo_rules, &snapshot);
    let prompt_text = redact::redact_prompt_block(&prompt_text, redacting);

    let schema = plan_schema_json();
    let (mut plan, raw) = app.provider.run_review(&prompt_text, &schema).await?;
    if max_issues > 0 && plan.issues.len() > max_issues {
        plan.issues.truncate(max_issues);
    }

    Ok(ReviewRun {
        full_ref,
        view,
        plan,
        raw,
        diff_text,
    })
}

fn load_template(app: &App) -> Result<String, GenerateError> {
    match &app.config.prompt.template_path {
        Some(path) => {
            std::fs::read_to_string(path).map_err(|source| GenerateError::Template {
                path: path.clone(),
                source,
            })
        }
        None => Ok(prompt::DEFAULT_TEMPLATE.to_string()),
    }
}

/// One line per changed file, with add/delete counts.
pub fn render_file_list(files: &[PRFile]) -> String {
    if files.is_empty() {
        return "No files".to_string();
    }
    files
        .iter()
        .map(|f| format!("{} (+{}/-{})", f.path, f.additions, f.deletions))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result of a saved draft.
pub struct DraftOutcome {
    pub full_ref: String,
    pub preview: String,
}

/// Generate a plan and persist it as the PR's draft review.
///
/// Also refreshes PR bookkeeping: the last-seen head moves on every
/// view, the last-reviewed head only here and on `review`.
pub async fn draft(app: &App, pr_ref: &str, max_issues: usize) -> Result<DraftOutcome, DraftError> {
    let run = generate(app, pr_ref, max_issues).await?;

    app.store.upsert_pr(
        &run.full_ref,
        &run.view.repository.name_with_owner,
        run.view.number,
        &run.view.head_ref_oid,
    )?;
    app.store
        .mark_reviewed(&run.full_ref, &run.view.head_ref_oid)?;

    let payload = DraftPayload {
        repo: run.view.repository.name_with_owner.clone(),
        number: run.view.number,
        base_sha: run.view.base_ref_oid.clone(),
        head_sha: run.view.head_ref_oid.clone(),
        plan: run.plan,
    };
    let payload_json = serde_json::to_string(&payload)?;
    let preview = render_draft_preview(&payload);
    app.store
        .upsert_draft_review(&run.full_ref, &payload_json, &preview)?;

    Ok(DraftOutcome {
        full_ref: run.full_ref,
        preview,
    })
}

/// Flags of the submit operation.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Skip the confirmation prompt.
    pub yes: bool,
    /// Render the preview and stop; no state change.
    pub dry_run: bool,
    /// Review event override (`approve|comment|request_changes`).
    pub event_override: Option<String>,
}

/// How a submit invocation ended.
#[derive(Debug)]
pub enum SubmitOutcome {
    Posted(CreateReviewResponse),
    DryRun,
    Aborted,
}

/// Submit the saved draft for `pr_ref`.
///
/// The preview goes to `out` before anything irreversible happens;
/// `confirm` is consulted unless `--yes` or `--dry-run` short-circuits.
/// On a successful post the PR row is refreshed, marked submitted, and
/// the draft deleted — in that order, so a crash mid-cleanup leaves the
/// draft inspectable rather than silently lost.
pub async fn submit<W, F>(
    app: &App,
    pr_ref: &str,
    options: &SubmitOptions,
    out: &mut W,
    mut confirm: F,
) -> Result<SubmitOutcome, SubmitError>
where
    W: Write,
    F: FnMut(&str) -> std::io::Result<bool>,
{
    let (repo, number) = parse_pr(pr_ref)?;
    let full_ref = crate::github::full_ref(&repo, number);

    let draft = match app.store.get_draft_review(&full_ref) {
        Ok(draft) => draft,
        Err(StoreError::NotFound) => return Err(SubmitError::NoDraft { full_ref }),
        Err(other) => return Err(other.into()),
    };
    let payload: DraftPayload = serde_json::from_str(&draft.payload_json)?;

    // Always remap against the current diff; the one from draft time may
    // be stale.
    let view = app.gh.pr_view(&full_ref).await?;
    let diff_text = app.gh.pr_diff(&full_ref).await?;
    let files = parse_unified(&diff_text);
    let position_map = build_position_map(&files)?;

    let (event, unknown_decision): (ReviewEvent, Option<UnknownDecision>) =
        match &options.event_override {
            Some(value) => {
                let event = ReviewEvent::from_str(value.trim())
                    .map_err(|_| SubmitError::InvalidEventOverride(value.clone()))?;
                (event, None)
            }
            None => match decision_to_event(&payload.plan.decision) {
                Ok(event) => (event, None),
                Err(unknown) => (ReviewEvent::Comment, Some(unknown)),
            },
        };

    let issue_positions = map_issues_to_positions(&position_map, &payload.plan.issues);
    let (comments, unmapped) = build_review_comments(&issue_positions);
    let body = build_review_body(&payload.plan.draft_review_body, &payload.plan.summary, &unmapped);

    let preview = render_submit_preview(
        &full_ref,
        &payload,
        &view.head_ref_oid,
        event,
        &body,
        &issue_positions,
        options.dry_run,
        unknown_decision.as_ref(),
    );
    out.write_all(preview.as_bytes())?;

    if options.dry_run {
        return Ok(SubmitOutcome::DryRun);
    }
    if !options.yes {
        let proceed = confirm(&format!("Post this review to {full_ref}? [y/N]: "))?;
        if !proceed {
            writeln!(out, "Aborted.")?;
            return Ok(SubmitOutcome::Aborted);
        }
    }

    let request = CreateReviewRequest {
        body,
        event,
        comments,
    };
    let response = app.gh.create_review(&repo, number, &request).await?;

    app.store.upsert_pr(
        &full_ref,
        &view.repository.name_with_owner,
        view.number,
        &view.head_ref_oid,
    )?;
    app.store.mark_submitted(&full_ref)?;
    app.store.delete_draft_review(&full_ref)?;

    if !response.html_url.trim().is_empty() {
        writeln!(out, "Submitted review: {}", response.html_url)?;
    } else if response.id != 0 {
        writeln!(out, "Submitted review id: {}", response.id)?;
    } else {
        writeln!(out, "Submitted review.")?;
    }
    Ok(SubmitOutcome::Posted(response))
}
