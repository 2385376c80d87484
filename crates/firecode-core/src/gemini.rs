//! Gemini bridge: thin reqwest client for the Generative Language API.
//!
//! The bridge never builds prompts itself — callers hand it payloads from the
//! prompt composer. A missing API key is detected before any network attempt
//! and surfaced as a distinct, user-actionable error.
//!
//! API key: `GEMINI_API_KEY` in `.env` (or `api_key` in the config file).
//! Default model: `gemini-3-pro-preview`.

use crate::config::CoreConfig;
use crate::prompt::PromptPayload;
use crate::shared::ChatMessage;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Tagged failure of one model call. Callers branch on the variant instead of
/// inspecting message text: `MissingApiKey` is a configuration error raised
/// before dispatch; the rest are service errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("No API key configured. Set GEMINI_API_KEY in your environment.")]
    MissingApiKey,
    #[error("Request to the model service failed: {0}")]
    Service(String),
    #[error("Model service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Model returned an empty response.")]
    EmptyResponse,
}

impl LlmError {
    /// True for configuration errors (no network was attempted).
    pub fn is_config(&self) -> bool {
        matches!(self, Self::MissingApiKey)
    }
}

/// Seam between the assistant and the hosted model. The production
/// implementation is [`GeminiBridge`]; tests inject scripted fakes.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// One-shot generation: system instruction + single user turn.
    async fn generate(&self, payload: &PromptPayload) -> Result<String, LlmError>;

    /// Conversational generation: system instruction + full ordered history.
    async fn converse(
        &self,
        system_instruction: &str,
        temperature: Option<f32>,
        history: &[ChatMessage],
    ) -> Result<String, LlmError>;
}

// Wire types for the generateContent endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Production [`LlmClient`] over the Gemini REST API.
pub struct GeminiBridge {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiBridge {
    /// Builds a bridge from resolved configuration. Fails with
    /// [`LlmError::MissingApiKey`] before any network attempt when no
    /// credential is available.
    pub fn from_config(config: &CoreConfig) -> Result<Self, LlmError> {
        let key = config.api_key().ok_or(LlmError::MissingApiKey)?;
        Ok(Self::new(key, &config.model, config.request_timeout_secs))
    }

    /// Builds a bridge with an explicit key and model.
    pub fn new(api_key: String, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            client,
        }
    }

    async fn dispatch(&self, body: &GenerateContentRequest) -> Result<String, LlmError> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model);
        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Service(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let parsed: GenerateContentResponse = res
            .json()
            .await
            .map_err(|e| LlmError::Service(format!("response parse failed: {}", e)))?;

        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiBridge {
    async fn generate(&self, payload: &PromptPayload) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: payload.system_instruction.clone() }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: payload.user_prompt.clone() }],
            }],
            generation_config: Some(GenerationConfig { temperature: payload.temperature }),
        };
        self.dispatch(&body).await
    }

    async fn converse(
        &self,
        system_instruction: &str,
        temperature: Option<f32>,
        history: &[ChatMessage],
    ) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: system_instruction.to_string() }],
            }),
            contents: history
                .iter()
                .map(|m| Content {
                    role: Some(m.role.wire_name().to_string()),
                    parts: vec![Part { text: m.text.clone() }],
                })
                .collect(),
            generation_config: temperature.map(|t| GenerationConfig { temperature: t }),
        };
        self.dispatch(&body).await
    }
}
