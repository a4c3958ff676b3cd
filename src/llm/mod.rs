pub mod ollama;
pub mod openai;
pub mod pipeline;
pub mod prompt_builder;
mod prompts;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{GenerationError, Result};
use crate::models::SummaryKind;

/// Output length cap for repository summaries.
const REPOSITORY_MAX_LENGTH: u32 = 1000;
/// Output length cap for commit activity summaries.
const ACTIVITY_MAX_LENGTH: u32 = 1500;

/// Sampling settings sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub no_repeat_ngram_size: u32,
    pub max_length: u32,
}

impl DecodingParams {
    /// Parameters for `kind`, never exceeding the configured `max_length`.
    pub fn for_kind(kind: SummaryKind, max_length: u32) -> Self {
        let cap = if kind.needs_commits() {
            ACTIVITY_MAX_LENGTH
        } else {
            REPOSITORY_MAX_LENGTH
        };
        Self {
            temperature: 0.7,
            top_p: 0.9,
            repetition_penalty: 1.2,
            no_repeat_ngram_size: 3,
            max_length: cap.min(max_length),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: DecodingParams,
}

/// Raw backend output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResult {
    pub raw_text: String,
    /// Token count reported by the backend, if any.
    pub tokens_used: Option<u64>,
}

/// A text-generation backend.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Identifier recorded as `model_used` on summaries.
    fn model_id(&self) -> &str;

    /// Whether the backend has been confirmed usable.
    fn is_ready(&self) -> bool;

    /// Run one generation. No retries.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    /// Token count of `text` using the backend's tokenizer, when it has one.
    fn count_tokens(&self, _text: &str) -> Option<u64> {
        None
    }
}

/// Call `client` with a wall-clock limit.
///
/// Fails fast with `ServiceUnavailable` when the backend is not ready, and turns
/// whitespace-only output into `EmptyResponse`.
pub async fn generate_with_timeout(
    client: &dyn GenerationClient,
    request: &GenerationRequest,
    timeout: Duration,
) -> Result<GenerationResult> {
    if !client.is_ready() {
        return Err(GenerationError::ServiceUnavailable(format!(
            "backend for model {} is not ready",
            client.model_id()
        )));
    }

    log::debug!(
        "Generating with {} (max_length={}, timeout={:?}):\n{}",
        client.model_id(),
        request.params.max_length,
        timeout,
        truncate(&request.prompt, 2000)
    );

    let result = tokio::time::timeout(timeout, client.generate(request))
        .await
        .map_err(|_| GenerationError::Timeout(timeout))??;

    if result.raw_text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    log::trace!("Raw generation output: {}", truncate(&result.raw_text, 3000));
    Ok(result)
}

/// Truncate long strings for debug logging.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    let total = s.chars().count();
    if total <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...\n[truncated {} chars]", total - max_chars)
    }
}
