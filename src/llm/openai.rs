use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GenerationClient, GenerationRequest, GenerationResult};
use crate::error::{GenerationError, Result};

/// Minimal request/response structs for the OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u64,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Chat completions take an additive `frequency_penalty` in [-2, 2] instead of a
/// multiplicative repetition penalty, so 1.0 (no penalty) maps to 0.0.
fn frequency_penalty(repetition_penalty: f32) -> f32 {
    (repetition_penalty - 1.0).clamp(-2.0, 2.0)
}

/// Client for hosted OpenAI-compatible chat-completion APIs.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, api_base_url: String) -> Self {
        OpenAiClient {
            client: Client::new(),
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn chat_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.api_base_url)
        }
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let req = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            frequency_penalty: frequency_penalty(request.params.repetition_penalty),
            max_tokens: request.params.max_length,
            stream: false,
        };

        log::info!("Calling OpenAI model {:?}", &self.model);

        let resp = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                GenerationError::ServiceUnavailable(format!("failed to send request to OpenAI: {e}"))
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            GenerationError::ParseError(format!("failed to read OpenAI response body: {e}"))
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(GenerationError::GenerationFailed(format!(
                "OpenAI API error: HTTP {} - {detail}",
                status.as_u16()
            )));
        }

        let chat_resp: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::ParseError(format!("failed to parse OpenAI response: {e}")))?;

        let content = chat_resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::ParseError("no choices returned from OpenAI".into()))?
            .message
            .content
            .unwrap_or_default();

        let tokens_used = chat_resp.usage.map(|u| u.total_tokens);
        if let Some(total) = tokens_used {
            log::debug!("Token usage: total={total}");
        }

        Ok(GenerationResult {
            raw_text: content,
            tokens_used,
        })
    }
}
