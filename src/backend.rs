//! Chat backends behind a single closed interface.
//!
//! `Backend` is a tagged union with exactly two variants: the OpenAI cloud
//! API and a local Ollama server. The variant is chosen once at construction
//! from configuration; construction performs all credential/runtime checks,
//! so a constructed backend only ever fails on the call itself. Callers never
//! branch on the variant again.

use crate::config::{BackendKind, Settings};
use crate::error::{BackendError, ConfigError};
use crate::types::{ChatRequest, ChatResponse, Message, OllamaChatRequest, OllamaChatResponse};
use std::time::Duration;

/// Fixed low-randomness sampling for command-oriented answers.
const CHAT_TEMPERATURE: f64 = 0.3;
/// How long the construction-time reachability probe waits for Ollama.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// A chat-completion provider, selected once at startup.
pub enum Backend {
    OpenAi(OpenAiClient),
    Ollama(OllamaClient),
}

impl Backend {
    /// Construct the configured backend, validating credentials/runtime.
    ///
    /// `model` already reflects any CLI override; defaults depend on the
    /// selected backend.
    pub async fn connect(settings: &Settings, model: String) -> Result<Self, ConfigError> {
        let timeout = Duration::from_secs(settings.network.api_timeout_secs);
        match settings.backend {
            BackendKind::Openai => {
                OpenAiClient::new(&settings.openai.base_url, &settings.openai.api_key, model, timeout)
                    .map(Self::OpenAi)
            }
            BackendKind::Ollama => {
                OllamaClient::connect(&settings.ollama.host, model, timeout)
                    .await
                    .map(Self::Ollama)
            }
        }
    }

    /// Send one system+user exchange and return the trimmed reply text.
    pub async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, BackendError> {
        match self {
            Self::OpenAi(client) => client.chat(system_prompt, user_prompt).await,
            Self::Ollama(client) => client.chat(system_prompt, user_prompt).await,
        }
    }

    /// The model id this backend sends requests for.
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi(client) => &client.model,
            Self::Ollama(client) => &client.model,
        }
    }

    /// The variant identifier, for reporting and run-log records.
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::OpenAi(_) => BackendKind::Openai,
            Self::Ollama(_) => BackendKind::Ollama,
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible cloud client
// ---------------------------------------------------------------------------

/// Client for the OpenAI chat completions API.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Build a client; fails when no credential is present.
    fn new(
        base_url: &str,
        api_key: &str,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model,
        })
    }

    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            temperature: Some(CHAT_TEMPERATURE),
        };

        tracing::debug!(model = %self.model, %url, "sending chat completion request");
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status(status, body));
        }

        let chat_response: ChatResponse = response.json().await?;
        first_choice_text(chat_response)
    }
}

/// Trimmed content of the first choice; empty string when the provider
/// returned a choice without content.
fn first_choice_text(response: ChatResponse) -> Result<String, BackendError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(BackendError::EmptyReply)?;
    Ok(choice.message.content.unwrap_or_default().trim().to_string())
}

// ---------------------------------------------------------------------------
// Ollama local client
// ---------------------------------------------------------------------------

/// Client for a local Ollama server's native chat endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    host: String,
    model: String,
}

impl OllamaClient {
    /// Build a client; fails when the local server does not answer a probe.
    async fn connect(host: &str, model: String, timeout: Duration) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build http client: {e}")))?;
        let host = host.trim_end_matches('/').to_string();

        let probe = format!("{host}/api/version");
        http.get(&probe)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ConfigError::OllamaUnreachable {
                host: host.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self { http, host, model })
    }

    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/chat", self.host);
        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            stream: false,
        };

        tracing::debug!(model = %self.model, %url, "sending ollama chat request");
        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status(status, body));
        }

        let chat_response: OllamaChatResponse = response.json().await?;
        Ok(ollama_reply_text(chat_response))
    }
}

/// Trimmed `message.content`; empty string when either level is absent.
fn ollama_reply_text(response: OllamaChatResponse) -> String {
    response
        .message
        .and_then(|message| message.content)
        .unwrap_or_default()
        .trim()
        .to_string()
}
