use std::time::Duration;

use aipdf_core::models::{BackendKind, Model};
use aipdf_core::prompt::CompletionRequest;
use serde::{Deserialize, Serialize};

use super::AiBackend;
use crate::credentials::{CredentialProvider, OPEN_ROUTER_SERVICE};
use crate::prelude::*;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenRouter connection settings.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub base_url: String,
    pub model: Model,
    pub timeout: Duration,
    /// Sent as `HTTP-Referer` for OpenRouter's app rankings.
    pub referer: Option<String>,
    /// Sent as `X-Title`.
    pub title: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: Model::default(),
            timeout: Duration::from_secs(120),
            referer: None,
            title: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: &'static str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Chat-completions client for <https://openrouter.ai>.
pub struct OpenRouter {
    client: reqwest::Client,
    config: OpenRouterConfig,
}

impl OpenRouter {
    pub fn new(config: OpenRouterConfig, credentials: &dyn CredentialProvider) -> Result<Self> {
        use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

        if !config.model.supports(BackendKind::OpenRouter) {
            return Err(Error::UnsupportedModel {
                model: config.model.name().to_string(),
                backend: BackendKind::OpenRouter.to_string(),
            }
            .into());
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if config.model.requires_auth() {
            let api_key = credentials.get_credential(OPEN_ROUTER_SERVICE)?;
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {api_key}"))
                    .map_err(|e| eyre!("Invalid header value: {}", e))?,
            );
        }
        if let Some(referer) = &config.referer {
            headers.insert(
                "http-referer",
                HeaderValue::from_str(referer).map_err(|e| eyre!("Invalid referer: {}", e))?,
            );
        }
        if let Some(title) = &config.title {
            headers.insert(
                "x-title",
                HeaderValue::from_str(title).map_err(|e| eyre!("Invalid title: {}", e))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        build_chat_request(self.config.model, request)
    }
}

fn build_chat_request(model: Model, request: &CompletionRequest) -> ChatRequest {
    let system = request
        .system_message
        .clone()
        .unwrap_or_else(|| model.default_system_message().to_string());

    ChatRequest {
        model: model.name(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: system,
            },
            ChatMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            },
        ],
    }
}

fn first_choice(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| Error::NoChoice.into())
}

impl AiBackend for OpenRouter {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = self.chat_request(request);
        log::debug!(
            "POST {} model={} max_tokens={}",
            self.endpoint(),
            body.model,
            body.max_tokens
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!("[{status}] {text}")).into());
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Backend(format!("invalid response body: {e}")))?;

        first_choice(parsed)
    }
}
