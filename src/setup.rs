use std::sync::Arc;

use log::{debug, warn};

use crate::config::{BackendKind, Config};
use crate::llm::GenerationClient;
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAiClient;
use crate::llm::pipeline::{NoopPipeline, PipelineClient, WhitespaceTokenizer};

/// Build the generation client for the configured backend.
///
/// The Ollama server is probed once here; an unreachable server yields a client that
/// reports not ready, so generation fails with `ServiceUnavailable`.
pub async fn build_client(cfg: &Config) -> Arc<dyn GenerationClient> {
    match cfg.backend {
        BackendKind::None => {
            debug!("Using offline dummy pipeline (no model calls)");
            Arc::new(PipelineClient::new(
                cfg.model.clone(),
                Box::new(NoopPipeline),
                Some(Arc::new(WhitespaceTokenizer)),
            ))
        }
        BackendKind::Ollama => {
            debug!("Using OllamaClient with model {} at {}", cfg.model, cfg.base_url);
            let client = OllamaClient::new(cfg.base_url.clone(), cfg.model.clone());
            if !client.check_health().await {
                warn!("Ollama at {} is not reachable", cfg.base_url);
            }
            Arc::new(client)
        }
        BackendKind::OpenAi => {
            debug!("Using OpenAiClient with model {}", cfg.model);
            Arc::new(OpenAiClient::new(
                cfg.api_key.clone().unwrap_or_default(),
                cfg.model.clone(),
                cfg.base_url.clone(),
            ))
        }
    }
}
