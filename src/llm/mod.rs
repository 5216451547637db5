//! Chat-completion provider integration
//!
//! Provides:
//! - An OpenAI-compatible chat client (`/chat/completions`, JSON-object mode)
//! - Text and image content parts for user messages
//! - `LlmOutcome`, the never-failing result of one generation attempt
//!
//! Exactly one provider call is made per request, with no retries.

mod json;

pub use json::{extract_json_object, parse_copy};

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::listing::{truncate_chars, Length, ListingInput};
use crate::prompt::Prompt;
use crate::Config;

/// Provider error bodies are cut to this many characters
const MAX_ERROR_BODY_CHARS: usize = 200;

/// One part of a multi-part user message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Message content: plain text, or parts when images are attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Chat message for the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(content.to_string()),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(content.to_string()),
        }
    }

    /// User message with one `image_url` part per image
    pub fn user_with_images(content: &str, images: &[String]) -> Self {
        if images.is_empty() {
            return Self::user(content);
        }

        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(ContentPart::Text {
            text: content.to_string(),
        });
        parts.extend(images.iter().map(|url| ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.clone(),
                detail: Some("low".to_string()),
            },
        }));

        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Copy fields the model returned; blank fields are `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmCopy {
    pub title: Option<String>,
    pub business: Option<String>,
    pub emotional: Option<String>,
}

/// Ways a provider call can fail
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider request failed: {0}")]
    Transport(String),

    #[error("provider did not answer within {0}s")]
    Timeout(u64),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unreadable provider response: {0}")]
    Envelope(String),

    #[error("provider returned no content")]
    EmptyContent,

    #[error("model output is not valid copy JSON: {0}")]
    Parse(String),
}

impl LlmError {
    /// Whether the provider answered badly (as opposed to a local failure)
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            LlmError::Timeout(_)
                | LlmError::Status { .. }
                | LlmError::Envelope(_)
                | LlmError::EmptyContent
        )
    }

    /// Value reported as `llm_status`
    pub fn status_tag(&self) -> String {
        match self {
            LlmError::Status { status, .. } => status.to_string(),
            LlmError::Timeout(_) => "timeout".to_string(),
            _ => "error".to_string(),
        }
    }
}

/// Result of one generation attempt
#[derive(Debug)]
pub enum LlmOutcome {
    /// Provider answered with parseable JSON; fields may still be missing
    Ok(LlmCopy),
    /// No credential configured, no call made
    MissingKey,
    Failed(LlmError),
}

impl LlmOutcome {
    /// Value reported as `llm_status`
    pub fn status(&self) -> String {
        match self {
            LlmOutcome::Ok(_) => "ok".to_string(),
            LlmOutcome::MissingKey => "missing_key".to_string(),
            LlmOutcome::Failed(e) => e.status_tag(),
        }
    }

    pub fn copy(&self) -> Option<&LlmCopy> {
        match self {
            LlmOutcome::Ok(copy) => Some(copy),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LlmError> {
        match self {
            LlmOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Chat-completion client
#[derive(Debug)]
pub struct LlmClient {
    /// HTTP client
    client: Client,
    /// API key; `None` means every call resolves to `MissingKey`
    api_key: Option<String>,
    /// API base URL, without trailing slash
    base_url: String,
    model: String,
    org_id: Option<String>,
    project_id: Option<String>,
    timeout_secs: u64,
}

impl LlmClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: non_blank(config.openai_api_key.as_deref()),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
            org_id: non_blank(config.openai_org_id.as_deref()),
            project_id: non_blank(config.openai_project_id.as_deref()),
            timeout_secs: config.llm_timeout_secs,
        })
    }

    /// Check if API key is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Attempt to generate copy for a listing
    pub async fn generate(&self, input: &ListingInput) -> LlmOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("no provider credential configured, skipping LLM call");
            return LlmOutcome::MissingKey;
        };

        let prompt = Prompt::build(input);
        let result = self
            .chat(api_key, &prompt, input.length)
            .await
            .and_then(|content| parse_copy(&content));

        match result {
            Ok(copy) => LlmOutcome::Ok(copy),
            Err(e) => {
                warn!(error = %e, "listing copy generation failed");
                LlmOutcome::Failed(e)
            }
        }
    }

    /// Send one chat completion request and return the message content
    async fn chat(&self, api_key: &str, prompt: &Prompt, length: Length) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::system(&prompt.system),
                ChatMessage::user_with_images(&prompt.user, &prompt.images),
            ],
            max_tokens: length.max_tokens(),
            temperature: length.temperature(),
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(
            model = %self.model,
            images = prompt.images.len(),
            max_tokens = request.max_tokens,
            "Sending chat request to provider"
        );

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request);
        if let Some(org_id) = &self.org_id {
            builder = builder.header("OpenAI-Organization", org_id);
        }
        if let Some(project_id) = &self.project_id {
            builder = builder.header("OpenAI-Project", project_id);
        }

        let response = builder.send().await.map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Provider API error: {} - {}", status, body);
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::Envelope(e.to_string())
            }
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    fn request_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout_secs)
        } else {
            LlmError::Transport(e.to_string())
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
