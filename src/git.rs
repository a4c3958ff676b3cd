use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::process::Command as GitCommand;

use crate::models::CommitRecord;

const RECORD_SEP: char = '\u{1e}';
const FIELD_SEP: char = '\u{1f}';

/// Run a git command in `repo` and capture stdout as String.
pub fn git_output(repo: &Path, args: &[&str]) -> Result<String> {
    let output = GitCommand::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {:?} in {}", args, repo.display()))?;

    if !output.status.success() {
        return Err(anyhow!(
            "git {:?} exited with status {:?}: {}",
            args,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Every commit from the last `since_days` days of the checked-out branch, most
/// recent first. Prompt building caps how many are shown, not this.
pub fn recent_commits(repo: &Path, since_days: u32) -> Result<Vec<CommitRecord>> {
    let since = format!("--since={since_days}.days");
    let out = git_output(
        repo,
        &[
            "log",
            since.as_str(),
            "--no-merges",
            "--numstat",
            "--format=%x1e%H%x1f%an%x1f%aI%x1f%s",
        ],
    )?;

    let commits = parse_log(&out);
    log::debug!(
        "Read {} commits from {} (last {since_days} days)",
        commits.len(),
        repo.display()
    );
    Ok(commits)
}

/// Parse the output of `git log --numstat` in the record format used by
/// [`recent_commits`].
fn parse_log(raw: &str) -> Vec<CommitRecord> {
    raw.split(RECORD_SEP)
        .filter(|chunk| !chunk.trim().is_empty())
        .filter_map(|chunk| {
            let mut lines = chunk.lines();
            let header = lines.next()?;
            let mut fields = header.split(FIELD_SEP);
            let sha = fields.next()?.trim().to_string();
            let author_name = fields.next().unwrap_or("").to_string();
            let author_date = fields
                .next()
                .and_then(|d| DateTime::parse_from_rfc3339(d.trim()).ok())
                .map(|d| d.with_timezone(&Utc));
            let message = fields.next().unwrap_or("").to_string();

            let (additions, deletions) = lines
                .filter_map(|line| {
                    let mut cols = line.split('\t');
                    // binary files report "-"
                    let adds = cols.next()?.parse::<u64>().unwrap_or(0);
                    let dels = cols.next()?.parse::<u64>().unwrap_or(0);
                    Some((adds, dels))
                })
                .fold((0, 0), |(a, d), (x, y)| (a + x, d + y));

            Some(CommitRecord {
                sha,
                message,
                author_name,
                author_date,
                additions,
                deletions,
            })
        })
        .collect()
}
