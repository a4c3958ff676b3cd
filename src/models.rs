use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository metadata as delivered by the GitHub client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySnapshot {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    #[serde(alias = "language")]
    pub primary_language: Option<String>,
    pub stars_count: u64,
    pub forks_count: u64,
    pub topics: Vec<String>,
    pub license_name: Option<String>,
    pub owner_login: String,
    pub is_fork: bool,
    pub is_archived: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single commit, most recent first when part of a sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitRecord {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub author_date: Option<DateTime<Utc>>,
    pub additions: u64,
    pub deletions: u64,
}

impl CommitRecord {
    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }
}

/// Which summary to produce. Selects both the prompt template and whether
/// commit data is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Overview,
    Technical,
    Business,
    Weekly,
    Commits,
    Default,
}

impl SummaryKind {
    /// Parse a kind name. Unknown names fall back to `Default`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "overview" => SummaryKind::Overview,
            "technical" => SummaryKind::Technical,
            "business" => SummaryKind::Business,
            "weekly" => SummaryKind::Weekly,
            "commits" => SummaryKind::Commits,
            _ => SummaryKind::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryKind::Overview => "overview",
            SummaryKind::Technical => "technical",
            SummaryKind::Business => "business",
            SummaryKind::Weekly => "weekly",
            SummaryKind::Commits => "commits",
            SummaryKind::Default => "default",
        }
    }

    /// Whether this kind summarizes commit activity rather than the repository itself.
    pub fn needs_commits(&self) -> bool {
        matches!(self, SummaryKind::Weekly | SummaryKind::Commits)
    }

    /// Title attached to the stored summary record.
    pub fn title_for(&self, full_name: &str) -> String {
        let label = match self {
            SummaryKind::Overview => "Repository Overview",
            SummaryKind::Technical => "Technical Analysis",
            SummaryKind::Business => "Business Analysis",
            SummaryKind::Weekly => "Weekly Activity",
            SummaryKind::Commits => "Commit Analysis",
            SummaryKind::Default => "Repository Summary",
        };
        format!("{label}: {full_name}")
    }
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final output of the generation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSummary {
    pub content: String,
    pub confidence_score: u8,
    pub model_used: String,
    pub processing_time_ms: u64,
    pub tokens_used: Option<u64>,
}

impl ScoredSummary {
    /// Map onto the record shape the persistence layer stores.
    pub fn into_record(self, repository: &RepositorySnapshot, kind: SummaryKind) -> SummaryRecord {
        let mut tags = vec![kind.as_str().to_string()];
        if let Some(lang) = &repository.primary_language {
            tags.push(lang.to_lowercase());
        }
        tags.extend(repository.topics.iter().take(3).cloned());
        tags.dedup();

        SummaryRecord {
            repository_full_name: repository.full_name.clone(),
            summary_type: kind.as_str().to_string(),
            title: kind.title_for(&repository.full_name),
            content: self.content,
            model_used: self.model_used,
            confidence_score: self.confidence_score,
            processing_time: self.processing_time_ms,
            tokens_used: self.tokens_used,
            tags,
            created_at: Utc::now(),
        }
    }
}

/// Stored-summary shape handed to the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub repository_full_name: String,
    pub summary_type: String,
    pub title: String,
    pub content: String,
    pub model_used: String,
    pub confidence_score: u8,
    pub processing_time: u64,
    pub tokens_used: Option<u64>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One entry of the `summarize --json` output, tagged with `status`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryReport {
    Generated(SummaryRecord),
    /// Activity summary skipped because the period had no commits.
    NoActivity {
        repository_full_name: String,
        summary_type: String,
        title: String,
        message: String,
    },
}

impl SummaryReport {
    pub fn no_activity(repository: &RepositorySnapshot, kind: SummaryKind, message: String) -> Self {
        SummaryReport::NoActivity {
            repository_full_name: repository.full_name.clone(),
            summary_type: kind.as_str().to_string(),
            title: kind.title_for(&repository.full_name),
            message,
        }
    }
}
