use domain::models::{ChatMessage, GenerationOptions, GenerationResult, PromptRequest};
use domain::providers::TextGenerator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::{GeneratorError, RemoteServiceError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub(crate) fn transport_error(err: reqwest::Error) -> RemoteServiceError {
    if err.is_decode() {
        RemoteServiceError::MalformedResponse(err.to_string())
    } else {
        RemoteServiceError::Network(err.to_string())
    }
}

/// Classifies a non-2xx response. OpenAI-style `{"error":{"message":..}}`
/// bodies are unwrapped.
pub(crate) fn status_error(status: u16, body: &str) -> RemoteServiceError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    match status {
        401 | 403 => RemoteServiceError::Authentication(message),
        429 => RemoteServiceError::RateLimited(message),
        _ => RemoteServiceError::Api { status, message },
    }
}

/// Client for Groq's OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct GroqClient {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl GroqClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeneratorError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<GenerationResult> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RemoteServiceError::Authentication("GROQ_API_KEY is not set".to_string())
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
            stream: false,
        };
        debug!(
            model = %options.model,
            temperature = options.temperature,
            "sending chat completion"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body).into());
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| RemoteServiceError::MalformedResponse(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                RemoteServiceError::MalformedResponse("response has no message content".to_string())
            })?;

        Ok(GenerationResult {
            text: content,
            model: parsed.model,
        })
    }
}

impl TextGenerator for GroqClient {
    async fn generate(
        &self,
        request: &PromptRequest,
        options: &GenerationOptions,
    ) -> Result<GenerationResult> {
        self.chat(&request.messages, options).await
    }
}
