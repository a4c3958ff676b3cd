use crate::error::{GenerationError, Result};
use crate::llm::GenerationResult;
use crate::models::ScoredSummary;
use crate::scoring;

/// Turn raw backend output into a [`ScoredSummary`].
///
/// Token usage prefers the backend's own count, then `fallback_tokens` (a tokenizer
/// estimate over prompt and content), else stays unset.
pub fn assemble(
    raw: &GenerationResult,
    model_id: &str,
    elapsed_ms: u64,
    fallback_tokens: Option<u64>,
) -> Result<ScoredSummary> {
    let content = raw.raw_text.trim();
    if content.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    Ok(ScoredSummary {
        content: content.to_string(),
        confidence_score: scoring::score(content),
        model_used: model_id.to_string(),
        processing_time_ms: elapsed_ms,
        tokens_used: raw.tokens_used.or(fallback_tokens),
    })
}
