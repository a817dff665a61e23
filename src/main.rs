//! revq — AI-assisted pull request review queue.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::process;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use revq::app::{App, AppOptions};
use revq::env::Env;
use revq::models::plan::plan_schema_json;
use revq::orchestrator;
use revq::queue::{self, CheckFilter, QueueItem, QueueSort};
use revq::review::preview::render_plan;

use cli::args::{Cli, Command, DraftArgs, PlanFormat, QueueArgs, ReviewArgs, SubmitArgs};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Cli::parse();

    let mut options = AppOptions::from_env(&Env::real());
    if args.config.is_some() {
        options.config_path = args.config.clone();
    }
    if args.db_path.is_some() {
        options.db_path = args.db_path.clone();
    }
    let app = App::init(&options).context("failed to initialize")?;

    match args.command {
        Command::Queue(queue_args) => run_queue(&app, queue_args).await,
        Command::Review(review_args) => run_review(&app, review_args).await,
        Command::Draft(draft_args) => run_draft(&app, draft_args).await,
        Command::Submit(submit_args) => run_submit(&app, submit_args).await,
        Command::Doctor => run_doctor(&app).await,
    }
}

/// List PRs awaiting the viewer's review.
async fn run_queue(app: &App, args: QueueArgs) -> Result<()> {
    let limit = args.limit.unwrap_or(app.config.queue.default_limit);
    let sort = match args.sort {
        Some(sort) => sort,
        None => QueueSort::from_str(&app.config.queue.default_sort).unwrap_or(QueueSort::Oldest),
    };

    let query = queue::build_queue_query(
        args.repo.as_deref(),
        args.owner.as_deref(),
        args.label.as_deref(),
        args.draft,
    );
    let (gh_sort, order) = queue::map_sort(sort);
    let items = app
        .gh
        .search_prs(&query, limit, gh_sort, order)
        .await
        .context("failed to search PRs")?;
    let mut queue = queue::build_queue_items(&items, chrono::Utc::now());

    if args.checks != CheckFilter::Any || sort == QueueSort::Ci {
        queue::apply_checks(&app.gh, &mut queue)
            .await
            .context("failed to fetch check runs")?;
    }
    if sort == QueueSort::Size {
        queue::apply_sizes(&app.gh, &mut queue)
            .await
            .context("failed to fetch PR sizes")?;
    }
    let mut queue = queue::filter_by_checks(queue, args.checks);
    queue::sort_queue(&mut queue, sort);

    if args.json {
        print_queue_json(&queue, limit)?;
    } else {
        print_queue_text(&queue, limit);
    }
    Ok(())
}

fn print_queue_text(queue: &[QueueItem], limit: usize) {
    if queue.is_empty() {
        println!("No PRs found.");
        return;
    }
    for item in queue {
        println!(
            "{} {}",
            format!("{}#{}", item.repo, item.number).bold(),
            item.title,
        );
        println!(
            "  {}",
            format!(
                "Author: {}  Age: {}d  Updated: {}d  Draft: {}  Checks: {}",
                item.author, item.age_days, item.updated_days, item.is_draft, item.checks,
            )
            .dimmed(),
        );
        println!("  {}", item.url.dimmed());
    }
    if queue.len() >= limit {
        println!("Showing first {limit} results. Refine with filters or raise --limit.");
    }
}

fn print_queue_json(queue: &[QueueItem], limit: usize) -> Result<()> {
    let mut payload = serde_json::json!({
        "items": queue,
        "limit": limit,
    });
    if queue.is_empty() {
        payload["message"] = serde_json::json!("No PRs found.");
    }
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Generate a review plan and print it.
async fn run_review(app: &App, args: ReviewArgs) -> Result<()> {
    let run = orchestrator::generate(app, &args.pr, args.max_issues).await?;

    app.store
        .upsert_pr(
            &run.full_ref,
            &run.view.repository.name_with_owner,
            run.view.number,
            &run.view.head_ref_oid,
        )
        .context("failed to record PR state")?;

    match args.format {
        PlanFormat::Json => {
            if run.raw.is_empty() {
                println!("{}", serde_json::to_string_pretty(&run.plan)?);
            } else {
                println!("{}", run.raw.trim_end());
            }
        }
        PlanFormat::Md => print!("{}", render_plan(&run.plan, true)),
        PlanFormat::Text => print!("{}", render_plan(&run.plan, false)),
    }
    Ok(())
}

/// Generate and persist a draft review.
async fn run_draft(app: &App, args: DraftArgs) -> Result<()> {
    let outcome = orchestrator::draft(app, &args.pr, args.max_issues).await?;
    print!("{}", outcome.preview);
    println!(
        "\nSaved locally. To post to GitHub, run: revq submit {}",
        outcome.full_ref,
    );
    Ok(())
}

/// Submit the saved draft review.
async fn run_submit(app: &App, args: SubmitArgs) -> Result<()> {
    let options = orchestrator::SubmitOptions {
        yes: args.yes,
        dry_run: args.dry_run,
        event_override: args.event,
    };
    let mut out = std::io::stdout();
    orchestrator::submit(app, &args.pr, &options, &mut out, cli::confirm).await?;
    Ok(())
}

/// Check external dependencies.
async fn run_doctor(app: &App) -> Result<()> {
    println!("revq doctor");
    let checks = async {
        app.gh
            .check_installed()
            .await
            .context("gh CLI not available")?;
        println!("- gh: {}", "ok".green());

        app.gh.auth_status().await.context("gh auth check failed")?;
        println!("- gh auth: {}", "ok".green());

        let schema = plan_schema_json();
        app.provider
            .health_check(&schema)
            .await
            .context("provider health check failed")?;
        println!("- provider: {}", "ok".green());
        Ok::<(), anyhow::Error>(())
    };
    match tokio::time::timeout(Duration::from_secs(10), checks).await {
        Ok(result) => result?,
        Err(_) => bail!("doctor checks timed out after 10s"),
    }
    println!("doctor checks passed");
    Ok(())
}
