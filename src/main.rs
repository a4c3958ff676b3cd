use anyhow::{anyhow, Context, Result};
use clap::Parser;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;

use repodigest::cli_args::{Cli, Command, InputArgs};
use repodigest::config::Config;
use repodigest::llm::prompt_builder;
use repodigest::models::SummaryReport;
use repodigest::{git, logging, setup};
use repodigest::{CommitRecord, RepositorySnapshot, Summarizer, SummaryKind, SummaryOutcome};

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))
}

fn load_commits(input: &InputArgs) -> Result<Option<Vec<CommitRecord>>> {
    if let Some(path) = &input.commits {
        return load_json(path).map(Some);
    }
    if let Some(repo) = &input.git {
        return git::recent_commits(repo, input.days).map(Some);
    }
    Ok(None)
}

fn load_repos(input: &InputArgs) -> Result<Vec<RepositorySnapshot>> {
    input.repos.iter().map(|p| load_json(p)).collect()
}

fn run_prompt(input: &InputArgs) -> Result<()> {
    let kind = SummaryKind::parse(&input.kind);
    let commits = load_commits(input)?;

    for repo in load_repos(input)? {
        println!("{}", prompt_builder::build(&repo, commits.as_deref(), kind));
    }
    Ok(())
}

fn spinner(count: usize, model: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message(format!("generating {count} summary(ies) with {model}..."));
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}

async fn run_summarize(cfg: &Config, input: &InputArgs, as_json: bool) -> Result<()> {
    let kind = SummaryKind::parse(&input.kind);
    let commits = load_commits(input)?;
    let repos = load_repos(input)?;

    let client = setup::build_client(cfg).await;
    let summarizer = Summarizer::new(client, cfg.timeout, cfg.max_length);

    let pb = spinner(repos.len(), summarizer.model_id())?;
    let outcomes = join_all(repos.iter().enumerate().map(|(id, repo)| {
        summarizer.summarize(id as i64, repo, commits.as_deref(), kind)
    }))
    .await;
    pb.finish_and_clear();

    let mut reports: Vec<SummaryReport> = Vec::new();
    let mut failures = 0usize;

    for (repo, outcome) in repos.iter().zip(outcomes) {
        match outcome {
            Ok(SummaryOutcome::Generated(summary)) => {
                let record = summary.into_record(repo, kind);
                if !as_json {
                    println!("## {}\n", record.title);
                    println!("{}\n", record.content);
                    println!(
                        "model: {} | confidence: {} | time: {}ms | tokens: {}\n",
                        record.model_used,
                        record.confidence_score,
                        record.processing_time,
                        record
                            .tokens_used
                            .map(|t| t.to_string())
                            .unwrap_or_else(|| "n/a".to_string())
                    );
                }
                reports.push(SummaryReport::Generated(record));
            }
            Ok(SummaryOutcome::NoActivity { message }) => {
                if !as_json {
                    println!("## {}\n\n{message}\n", kind.title_for(&repo.full_name));
                }
                reports.push(SummaryReport::no_activity(repo, kind, message));
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {e}", repo.full_name);
            }
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if failures > 0 {
        return Err(anyhow!("{failures} of {} summaries failed", repos.len()));
    }
    Ok(())
}

async fn run_health(cfg: &Config) -> Result<()> {
    let client = setup::build_client(cfg).await;
    if client.is_ready() {
        println!("{:?} backend ready (model {})", cfg.backend, client.model_id());
        Ok(())
    } else {
        Err(anyhow!(
            "{:?} backend at {} is not available",
            cfg.backend,
            cfg.base_url
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match &cli.command {
        Command::Prompt { input } => run_prompt(input),
        Command::Summarize { input, json } => {
            let cfg = Config::from_sources(&cli)?;
            run_summarize(&cfg, input, *json).await
        }
        Command::Health => {
            let cfg = Config::from_sources(&cli)?;
            run_health(&cfg).await
        }
    }
}
