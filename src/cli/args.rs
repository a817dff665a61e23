//! Clap argument types.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use revq::queue::{CheckFilter, DraftFilter, QueueSort};

/// Pull request review queue.
#[derive(Parser, Debug)]
#[command(name = "revq", version = revq::constants::VERSION, about = "Pull request review queue")]
pub struct Cli {
    /// Override the user config file path.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the local database path.
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// List PRs where your review is requested.
    Queue(QueueArgs),

    /// Generate a review plan and print it (nothing is saved).
    Review(ReviewArgs),

    /// Generate and save a draft review (not posted).
    Draft(DraftArgs),

    /// Submit the saved draft review to GitHub.
    Submit(SubmitArgs),

    /// Check dependencies and configuration.
    Doctor,
}

/// Arguments for the `queue` subcommand.
#[derive(Parser, Debug)]
pub struct QueueArgs {
    /// Max results (config default when omitted).
    #[arg(long)]
    pub limit: Option<usize>,

    /// Filter by repo OWNER/REPO.
    #[arg(long)]
    pub repo: Option<String>,

    /// Filter by org/owner.
    #[arg(long)]
    pub owner: Option<String>,

    /// Filter by label.
    #[arg(long)]
    pub label: Option<String>,

    /// Filter by check status.
    #[arg(long, value_enum, default_value = "any")]
    pub checks: CheckFilter,

    /// Filter by draft state.
    #[arg(long, value_enum, default_value = "any")]
    pub draft: DraftFilter,

    /// Sort order (config default when omitted).
    #[arg(long, value_enum)]
    pub sort: Option<QueueSort>,

    /// Output JSON instead of text.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Output format for the `review` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Text,
    Json,
    Md,
}

/// Arguments for the `review` subcommand.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// PR reference: OWNER/REPO#123 or a PR URL.
    pub pr: String,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: PlanFormat,

    /// Limit the number of issues (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    pub max_issues: usize,
}

/// Arguments for the `draft` subcommand.
#[derive(Parser, Debug)]
pub struct DraftArgs {
    /// PR reference: OWNER/REPO#123 or a PR URL.
    pub pr: String,

    /// Limit the number of issues (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    pub max_issues: usize,
}

/// Arguments for the `submit` subcommand.
#[derive(Parser, Debug)]
pub struct SubmitArgs {
    /// PR reference: OWNER/REPO#123 or a PR URL.
    pub pr: String,

    /// Skip the confirmation prompt.
    #[arg(long, default_value_t = false)]
    pub yes: bool,

    /// Preview only; do not post.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Override the review event (approve, comment, request_changes).
    #[arg(long)]
    pub event: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_submit_flags() {
        let cli = Cli::try_parse_from([
            "revq", "submit", "acme/app#1", "--yes", "--dry-run", "--event", "approve",
        ])
        .unwrap();
        match cli.command {
            Command::Submit(args) => {
                assert_eq!(args.pr, "acme/app#1");
                assert!(args.yes);
                assert!(args.dry_run);
                assert_eq!(args.event.as_deref(), Some("approve"));
            }
            _ => panic!("expected submit command"),
        }
    }

    #[test]
    fn submit_defaults_are_conservative() {
        let cli = Cli::try_parse_from(["revq", "submit", "acme/app#1"]).unwrap();
        match cli.command {
            Command::Submit(args) => {
                assert!(!args.yes);
                assert!(!args.dry_run);
                assert!(args.event.is_none());
            }
            _ => panic!("expected submit command"),
        }
    }

    #[test]
    fn parse_queue_filters() {
        let cli = Cli::try_parse_from([
            "revq", "queue", "--repo", "acme/app", "--checks", "failure", "--sort", "updated",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Queue(args) => {
                assert_eq!(args.repo.as_deref(), Some("acme/app"));
                assert_eq!(args.checks, CheckFilter::Failure);
                assert_eq!(args.sort, Some(QueueSort::Updated));
                assert!(args.json);
            }
            _ => panic!("expected queue command"),
        }
    }

    #[test]
    fn review_format_values() {
        let cli = Cli::try_parse_from(["revq", "review", "acme/app#1", "--format", "md"]).unwrap();
        match cli.command {
            Command::Review(args) => assert_eq!(args.format, PlanFormat::Md),
            _ => panic!("expected review command"),
        }
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::try_parse_from([
            "revq",
            "draft",
            "acme/app#1",
            "--db-path",
            "/tmp/state.db",
        ])
        .unwrap();
        assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/state.db")));
    }

    #[test]
    fn missing_pr_argument_is_an_error() {
        assert!(Cli::try_parse_from(["revq", "submit"]).is_err());
    }
}
