//! OpenAI-compatible chat completion client

use super::prompt::SYSTEM_PROMPT;
use super::ProposalGenerator;
use crate::config::GeneratorConfig;
use crate::{GenerateError, GenerateResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
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
    content: Option<String>,
}

/// [`ProposalGenerator`] that calls `POST {endpoint}/chat/completions`
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    completions_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsClient {
    /// Creates a client for the given endpoint and credentials
    pub fn new(
        endpoint: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> GenerateResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            completions_url: format!("{}/chat/completions", endpoint.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Creates a client from configuration, reading the API key from the
    /// configured environment variable
    pub fn from_config(config: &GeneratorConfig) -> GenerateResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerateError::MissingApiKey(config.api_key_env.clone()))?;

        Self::new(
            &config.endpoint,
            api_key,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ProposalGenerator for ChatCompletionsClient {
    async fn complete(&self, prompt: &str) -> GenerateResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        tracing::debug!(
            "Requesting completion from {} ({} prompt chars)",
            self.completions_url,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Completion request failed with HTTP {}", status);
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerateError::EmptyResponse)
    }
}
