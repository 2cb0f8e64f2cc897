use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::protocol::NarrativePrompt;
use tracing::{debug, error};
use url::Url;

use crate::{error::NarrativeError, NarrativeGenerator};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiNarrativeClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenAiNarrativeClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, NarrativeError> {
        Ok(Self {
            http: Client::new(),
            endpoint: chat_completions_url(base_url)?,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl NarrativeGenerator for OpenAiNarrativeClient {
    async fn generate(&self, prompt: &NarrativePrompt) -> Result<String, NarrativeError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "narrative: sending request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "narrative: http request failed");
                NarrativeError::Http(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, %message, "narrative: service returned an error");
            return Err(NarrativeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(NarrativeError::EmptyResponse)
    }
}

/// Stands in when no narrative backend is configured.
pub struct MissingNarrativeGenerator;

#[async_trait]
impl NarrativeGenerator for MissingNarrativeGenerator {
    async fn generate(&self, _prompt: &NarrativePrompt) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable(
            "no narrative API key configured".into(),
        ))
    }
}

pub(crate) fn chat_completions_url(base_url: &str) -> Result<Url, NarrativeError> {
    let mut base = Url::parse(base_url.trim())
        .map_err(|e| NarrativeError::InvalidEndpoint(format!("{base_url}: {e}")))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("chat/completions")
        .map_err(|e| NarrativeError::InvalidEndpoint(format!("{base_url}: {e}")))
}

#[cfg(test)]
#[path = "tests/narrative_tests.rs"]
mod tests;
