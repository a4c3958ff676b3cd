//! In-process generation: a loaded model object driven on the blocking pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{DecodingParams, GenerationClient, GenerationRequest, GenerationResult};
use crate::error::{GenerationError, Result};

/// A synchronous text-generation model. Calls may block for the whole inference.
pub trait TextPipeline: Send {
    fn generate(&mut self, prompt: &str, params: &DecodingParams) -> anyhow::Result<String>;
}

/// Tokenizer paired with a pipeline, used for token-usage estimates.
pub trait Tokenizer: Send + Sync {
    fn count(&self, text: &str) -> u64;
}

/// Counts whitespace-separated words. A rough stand-in when no real tokenizer is loaded.
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn count(&self, text: &str) -> u64 {
        text.split_whitespace().count() as u64
    }
}

/// Adapts a [`TextPipeline`] to [`GenerationClient`].
///
/// The pipeline is not assumed reentrant, so calls are serialized behind a mutex and
/// run with `spawn_blocking` to keep the async workers free.
pub struct PipelineClient {
    model: String,
    pipeline: Arc<Mutex<Box<dyn TextPipeline>>>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    ready: AtomicBool,
}

impl PipelineClient {
    pub fn new(
        model: impl Into<String>,
        pipeline: Box<dyn TextPipeline>,
        tokenizer: Option<Arc<dyn Tokenizer>>,
    ) -> Self {
        Self {
            model: model.into(),
            pipeline: Arc::new(Mutex::new(pipeline)),
            tokenizer,
            ready: AtomicBool::new(true),
        }
    }

    /// Mark the model as loaded or unloaded.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}

#[async_trait]
impl GenerationClient for PipelineClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let pipeline = Arc::clone(&self.pipeline);
        let prompt = request.prompt.clone();
        let params = request.params;

        let output = tokio::task::spawn_blocking(move || {
            let mut guard = pipeline
                .lock()
                .map_err(|_| GenerationError::GenerationFailed("model pipeline lock poisoned".into()))?;
            guard
                .generate(&prompt, &params)
                .map_err(|e| GenerationError::GenerationFailed(format!("{e:#}")))
        })
        .await
        .map_err(|e| GenerationError::GenerationFailed(format!("generation worker failed: {e}")))??;

        Ok(GenerationResult {
            raw_text: output,
            tokens_used: None,
        })
    }

    fn count_tokens(&self, text: &str) -> Option<u64> {
        self.tokenizer.as_ref().map(|t| t.count(text))
    }
}

/// Offline pipeline for `--no-model` runs. Echoes what it was asked about.
pub struct NoopPipeline;

impl TextPipeline for NoopPipeline {
    fn generate(&mut self, prompt: &str, params: &DecodingParams) -> anyhow::Result<String> {
        let subject = prompt
            .lines()
            .find_map(|l| l.strip_prefix("Repository: "))
            .unwrap_or("this repository");
        Ok(format!(
            "[DUMMY SUMMARY] No model was called for {subject}. \
             The prompt had {} lines and allowed up to {} output tokens.",
            prompt.lines().count(),
            params.max_length
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::SummaryKind;
    use anyhow::anyhow;
    use std::time::Duration;

    struct Failing;

    impl TextPipeline for Failing {
        fn generate(&mut self, _prompt: &str, _params: &DecodingParams) -> anyhow::Result<String> {
            Err(anyhow!("tensor shape mismatch"))
        }
    }

    struct Sleepy(Duration);

    impl TextPipeline for Sleepy {
        fn generate(&mut self, prompt: &str, _params: &DecodingParams) -> anyhow::Result<String> {
            std::thread::sleep(self.0);
            Ok(prompt.to_uppercase())
        }
    }

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.into(),
            params: DecodingParams::for_kind(SummaryKind::Overview, 512),
        }
    }

    #[tokio::test]
    async fn noop_pipeline_names_the_repository() {
        let client = PipelineClient::new("noop", Box::new(NoopPipeline), Some(Arc::new(WhitespaceTokenizer)));
        let result = client
            .generate(&request("Summarize:\n\nRepository: octo/demo\n"))
            .await
            .unwrap();
        assert!(result.raw_text.contains("octo/demo"));
        assert_eq!(client.count_tokens("one two three"), Some(3));
    }

    #[tokio::test]
    async fn pipeline_errors_become_generation_failed() {
        let client = PipelineClient::new("broken", Box::new(Failing), None);
        let err = client.generate(&request("x")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GenerationFailed);
        assert!(err.to_string().contains("tensor shape mismatch"));
        assert_eq!(client.count_tokens("x"), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_calls_are_serialized() {
        let client = Arc::new(PipelineClient::new(
            "sleepy",
            Box::new(Sleepy(Duration::from_millis(50))),
            None,
        ));
        let started = std::time::Instant::now();
        let (req_a, req_b) = (request("a"), request("b"));
        let (a, b) = tokio::join!(client.generate(&req_a), client.generate(&req_b));
        assert_eq!(a.unwrap().raw_text, "A");
        assert_eq!(b.unwrap().raw_text, "B");
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn readiness_can_be_toggled() {
        let client = PipelineClient::new("noop", Box::new(NoopPipeline), None);
        assert!(client.is_ready());
        client.set_ready(false);
        assert!(!client.is_ready());
    }
}
