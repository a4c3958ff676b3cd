use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::SummarizeError;
use crate::llm::{self, prompt_builder, DecodingParams, GenerationClient, GenerationRequest};
use crate::models::{CommitRecord, RepositorySnapshot, ScoredSummary, SummaryKind};
use crate::summary;
use crate::tasks::TaskTracker;

pub const NO_ACTIVITY_MESSAGE: &str = "No commits in the last week. There is no activity to summarize.";

/// Result of a summary request.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Generated(ScoredSummary),
    /// An activity summary was requested but there were no commits; no model was called.
    NoActivity { message: String },
}

/// Runs prompt building, generation, scoring and assembly for one request at a time
/// per repository id.
#[derive(Clone)]
pub struct Summarizer {
    client: Arc<dyn GenerationClient>,
    tracker: TaskTracker,
    timeout: Duration,
    max_length: u32,
}

impl Summarizer {
    pub fn new(client: Arc<dyn GenerationClient>, timeout: Duration, max_length: u32) -> Self {
        Self {
            client,
            tracker: TaskTracker::new(),
            timeout,
            max_length,
        }
    }

    /// Use an existing tracker, e.g. one shared with a status endpoint.
    pub fn with_tracker(mut self, tracker: TaskTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub fn model_id(&self) -> &str {
        self.client.model_id()
    }

    pub async fn summarize(
        &self,
        id: i64,
        repository: &RepositorySnapshot,
        commits: Option<&[CommitRecord]>,
        kind: SummaryKind,
    ) -> Result<SummaryOutcome, SummarizeError> {
        self.tracker
            .begin(id, format!("Generating {kind} summary for {}", repository.full_name))?;
        let task = RunningTask::new(&self.tracker, id);

        if kind.needs_commits() && commits.is_none_or(|c| c.is_empty()) {
            log::info!(
                "No commits for {}; skipping {kind} generation",
                repository.full_name
            );
            task.complete(NO_ACTIVITY_MESSAGE);
            return Ok(SummaryOutcome::NoActivity {
                message: NO_ACTIVITY_MESSAGE.to_string(),
            });
        }

        match self.generate(id, repository, commits, kind).await {
            Ok(summary) => {
                task.complete(format!("Summary generated in {}ms", summary.processing_time_ms));
                Ok(SummaryOutcome::Generated(summary))
            }
            Err(e) => {
                log::error!("{kind} summary for {} failed: {e}", repository.full_name);
                task.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    async fn generate(
        &self,
        id: i64,
        repository: &RepositorySnapshot,
        commits: Option<&[CommitRecord]>,
        kind: SummaryKind,
    ) -> crate::error::Result<ScoredSummary> {
        let request = GenerationRequest {
            prompt: prompt_builder::build(repository, commits, kind),
            params: DecodingParams::for_kind(kind, self.max_length),
        };

        log::info!(
            "Generating {kind} summary for repository {} with {}",
            repository.full_name,
            self.client.model_id()
        );
        self.tracker.progress(id, "Waiting for the model");

        let started = Instant::now();
        let raw = llm::generate_with_timeout(self.client.as_ref(), &request, self.timeout).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let fallback_tokens = if raw.tokens_used.is_none() {
            self.client
                .count_tokens(&format!("{}{}", request.prompt, raw.raw_text.trim()))
        } else {
            None
        };

        let summary = summary::assemble(&raw, self.client.model_id(), elapsed_ms, fallback_tokens)?;
        log::info!(
            "Generated {kind} summary for {} in {}ms (confidence {})",
            repository.full_name,
            summary.processing_time_ms,
            summary.confidence_score
        );
        Ok(summary)
    }
}

const CANCELLED_MESSAGE: &str = "generation cancelled";

/// Keeps a tracker entry out of `generating` once its request is gone. Dropping it
/// without calling `complete` or `fail` (the summarize future was cancelled)
/// marks the task failed.
struct RunningTask<'a> {
    tracker: &'a TaskTracker,
    id: i64,
    finished: bool,
}

impl<'a> RunningTask<'a> {
    fn new(tracker: &'a TaskTracker, id: i64) -> Self {
        Self {
            tracker,
            id,
            finished: false,
        }
    }

    fn complete(mut self, message: impl Into<String>) {
        self.finished = true;
        self.tracker.complete(self.id, message);
    }

    fn fail(mut self, error: impl Into<String>) {
        self.finished = true;
        self.tracker.fail(self.id, error);
    }
}

impl Drop for RunningTask<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!("Summary task {} dropped before finishing", self.id);
            self.tracker.fail(self.id, CANCELLED_MESSAGE);
        }
    }
}
