use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use musli::json;
use musli::{Decode, Encode};
use reqwest::Client;

use super::{GenerationClient, GenerationRequest, GenerationResult};
use crate::error::{GenerationError, Result};

#[derive(Debug, Encode)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    repeat_penalty: f32,
    num_predict: u32,
}

#[derive(Debug, Encode)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Decode)]
struct GenerateResponse {
    response: String,
    #[musli(default)]
    eval_count: Option<u64>,
    #[musli(default)]
    prompt_eval_count: Option<u64>,
}

#[derive(Debug, Decode)]
struct ErrorResponse {
    error: String,
}

/// Ollama client using the non-streaming `/api/generate` endpoint.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
    ready: AtomicBool,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            ready: AtomicBool::new(false),
        }
    }

    /// Probe `/api/tags` and record whether the server answered.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let ok = match self.http.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                log::warn!("Ollama health check against {url} failed: {e}");
                false
            }
        };
        self.ready.store(ok, Ordering::SeqCst);
        ok
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let body = GenerateRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            stream: false,
            options: GenerateOptions {
                temperature: request.params.temperature,
                top_p: request.params.top_p,
                repeat_penalty: request.params.repetition_penalty,
                num_predict: request.params.max_length,
            },
        };

        let body_str = json::to_string(&body).map_err(|e| {
            GenerationError::GenerationFailed(format!("failed to encode Ollama request: {e}"))
        })?;

        let url = format!("{}/api/generate", self.base_url);
        log::info!("Calling Ollama model {:?} at {url}", self.model);

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body_str)
            .send()
            .await
            .map_err(|e| {
                GenerationError::ServiceUnavailable(format!("error calling Ollama at {url}: {e}"))
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            GenerationError::ParseError(format!("failed to read Ollama response body: {e}"))
        })?;

        log::trace!("Ollama raw JSON response: {text}");

        if !status.is_success() {
            let parsed: std::result::Result<ErrorResponse, _> = json::from_str(&text);
            let detail = parsed.map(|e| e.error).unwrap_or(text);
            return Err(GenerationError::GenerationFailed(format!(
                "Ollama HTTP {}: {detail}",
                status.as_u16()
            )));
        }

        let parsed: GenerateResponse = json::from_str(&text)
            .map_err(|e| GenerationError::ParseError(format!("failed to decode Ollama JSON: {e}")))?;

        let tokens_used = match (parsed.prompt_eval_count, parsed.eval_count) {
            (None, None) => None,
            (prompt, eval) => Some(prompt.unwrap_or(0) + eval.unwrap_or(0)),
        };

        Ok(GenerationResult {
            raw_text: parsed.response,
            tokens_used,
        })
    }
}
