use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::prompt::{build_system_prompt, parse_load_file_event};
use crate::config::{EndpointConfig, EndpointKind};

// ── Conversation message types ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub image: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            image: None,
        }
    }
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            image: None,
        }
    }
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, url: Option<impl Into<String>>) -> Self {
        self.image = url.map(Into::into);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0} env var not set")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to parse API response: {0}")]
    Decode(String),

    #[error("API returned empty content")]
    EmptyContent,
}

/// Sends the whole conversation and returns one raw assistant reply.
/// Implementations hold no conversation state between calls.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, ChatError>;
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct RelayRequest {
    messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
struct RelayReply {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RelayFailure {
    error: String,
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Deserialize)]
struct ApiChoiceMessage {
    content: Option<String>,
}

// ── HTTP client builder ───────────────────────────────────────────────────────

pub fn build_http_client(config: &EndpointConfig) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();

    if let Ok(proxy_url) = std::env::var("HTTP_PROXY") {
        builder = builder.proxy(reqwest::Proxy::all(&proxy_url)?);
    }

    if let Some(ms) = config.timeout_ms {
        builder = builder
            .timeout(std::time::Duration::from_millis(ms))
            .connect_timeout(std::time::Duration::from_secs(10));
    }

    builder.build().map_err(Into::into)
}

pub fn client_from_config(
    http: reqwest::Client,
    config: &EndpointConfig,
) -> Result<Arc<dyn CompletionClient>, ChatError> {
    match config.kind {
        EndpointKind::Relay => Ok(Arc::new(RelayClient {
            http,
            url: config.url.clone(),
        })),
        EndpointKind::Openrouter => {
            let api_key = std::env::var(&config.api_key_env)
                .ok()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| ChatError::MissingApiKey(config.api_key_env.clone()))?;
            Ok(Arc::new(OpenRouterClient {
                http,
                base_url: config.url.trim_end_matches('/').to_string(),
                model: config.model.clone(),
                api_key,
                referer: config.referer.clone(),
                title: config.title.clone(),
            }))
        }
    }
}

// ── Relay ─────────────────────────────────────────────────────────────────────

/// Talks to the stateless prompt relay, which owns the system prompt.
pub struct RelayClient {
    http: reqwest::Client,
    url: String,
}

#[async_trait]
impl CompletionClient for RelayClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, ChatError> {
        let resp = self
            .http
            .post(&self.url)
            .json(&relay_body(messages))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                message: relay_error_message(&text),
            });
        }
        parse_relay_reply(&text)
    }
}

fn relay_body(messages: &[Message]) -> RelayRequest {
    RelayRequest {
        messages: messages.iter().map(to_wire).collect(),
    }
}

fn relay_error_message(body: &str) -> String {
    serde_json::from_str::<RelayFailure>(body)
        .map(|f| f.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn parse_relay_reply(body: &str) -> Result<String, ChatError> {
    let reply: RelayReply =
        serde_json::from_str(body).map_err(|e| ChatError::Decode(e.to_string()))?;
    reply
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(ChatError::EmptyContent)
}

// ── OpenRouter (OpenAI-compatible) ────────────────────────────────────────────

/// Calls the model directly and does the relay's job of prepending the
/// system prompt and loading requested manuals.
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    referer: Option<String>,
    title: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, ChatError> {
        let mut req = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&openrouter_body(&self.model, messages));
        if let Some(referer) = &self.referer {
            req = req.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            req = req.header("X-Title", title);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                message: text.trim().to_string(),
            });
        }
        parse_openrouter_reply(&text)
    }
}

fn openrouter_body(model: &str, messages: &[Message]) -> ApiRequest {
    let manuals: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .filter_map(|m| parse_load_file_event(&m.content))
        .collect();

    let mut wire = vec![WireMessage {
        role: Role::System.as_str(),
        content: build_system_prompt(manuals),
    }];
    wire.extend(
        messages
            .iter()
            .filter(|m| !(m.role == Role::System && parse_load_file_event(&m.content).is_some()))
            .map(to_wire),
    );

    ApiRequest {
        model: model.to_string(),
        messages: wire,
    }
}

fn parse_openrouter_reply(body: &str) -> Result<String, ChatError> {
    let parsed: ApiResponse =
        serde_json::from_str(body).map_err(|e| ChatError::Decode(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(ChatError::EmptyContent)
}

fn to_wire(m: &Message) -> WireMessage {
    WireMessage {
        role: m.role.as_str(),
        content: m.content.clone(),
    }
}
