//! Chat-completions client.
//!
//! The client is stateless and shared by every chat; message history lives in
//! [`Conversation`](super::Conversation), owned by each chat's dialogue state.
//! The API key and message contents are never logged.

use std::{future::Future, time::Instant};

use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::conversation::ChatMessage;
use crate::{config::OpenAiConfig, error::GatewayError};

/// Something that turns an ordered message history into the next reply.
pub trait Completion: Send + Sync {
    fn complete(
        &self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ChatGpt {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatGpt {
    pub fn new(config: &OpenAiConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            client: builder.build()?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Completion for ChatGpt {
    #[instrument(level = "info", skip(self, messages), fields(model = %self.model, history = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, concat!("gptquizbot/", env!("CARGO_PKG_VERSION")))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = extract_api_error(&body).unwrap_or(body);
            return Err(GatewayError::Status { status, message });
        }

        let body: CompletionResponse = response.json().await?;
        if let Some(usage) = &body.usage {
            info!(
                prompt_tokens = ?usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                total_tokens = ?usage.total_tokens,
                "completion usage"
            );
        }

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            reply_len = text.len(),
            "completion received"
        );

        Ok(text)
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
    #[serde(default)]
    total_tokens: Option<u32>,
}

/// Pulls `error.message` out of an API error body.
fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(Deserialize)]
    struct Detail {
        message: String,
    }

    serde_json::from_str::<Envelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}
