use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::RecipeAiConfig;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Text completion backend used to generate recipe suggestions.
#[async_trait]
pub trait RecipeClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiRecipeClient {
    http: Client,
    config: RecipeAiConfig,
}

impl OpenAiRecipeClient {
    pub fn new(config: RecipeAiConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("build http client")?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl RecipeClient for OpenAiRecipeClient {
    #[instrument(skip_all)]
    async fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.7,
        };

        let res = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("send chat completion")?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            anyhow::bail!("chat completion returned {}: {}", status, detail);
        }

        let parsed: ChatResponse = res.json().await.context("decode chat completion")?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .context("chat completion has no content")?;
        debug!(model = %self.config.model, chars = content.len(), "chat completion received");
        Ok(content)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        let client = OpenAiRecipeClient::new(RecipeAiConfig {
            base_url: "http://localhost:11434/v1/".into(),
            api_key: "k".into(),
            model: "m".into(),
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn request_shape() {
        let body = ChatRequest {
            model: "gpt",
            messages: vec![ChatMessage { role: "user", content: "hi" }],
            temperature: 0.7,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn response_shape() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Meal Name: Soup"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Meal Name: Soup"));
    }
}
