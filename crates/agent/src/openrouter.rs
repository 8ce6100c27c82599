//! OpenRouter chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use fatoura_core::config::LlmConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::llm::{CompletionRequest, LlmClient, LlmError};

#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    app_title: String,
}

impl OpenRouterClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or(LlmError::MissingCredential)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| LlmError::Transport(format!("failed to build http client: {error}")))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.clone(),
            app_title: config.app_title.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .header("X-Title", &self.app_title)
            .json(&ChatRequest::from(request))
            .send()
            .await
            .map_err(|error| LlmError::Transport(error.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|error| LlmError::Transport(error.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|error| LlmError::Decode(error.to_string()))?;
        Ok(parsed.reply_text())
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a CompletionRequest> for ChatRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: vec![ChatMessage { role: "user", content: &request.prompt }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatReply>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, empty when the provider sent none.
    fn reply_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use fatoura_core::config::AppConfig;
    use serde_json::json;

    use super::{ChatRequest, ChatResponse, OpenRouterClient};
    use crate::llm::{CompletionRequest, LlmError};

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let request = CompletionRequest {
            model: "anthropic/claude-3-haiku".to_string(),
            prompt: "Génère des lignes".to_string(),
            max_tokens: 1000,
            temperature: 0.25,
        };

        let body = serde_json::to_value(ChatRequest::from(&request)).expect("serialize");

        assert_eq!(
            body,
            json!({
                "model": "anthropic/claude-3-haiku",
                "messages": [{ "role": "user", "content": "Génère des lignes" }],
                "max_tokens": 1000,
                "temperature": 0.25,
            })
        );
    }

    #[test]
    fn reply_text_reads_first_choice() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "gen-1",
            "choices": [
                { "message": { "role": "assistant", "content": "{\"items\":[]}" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        }))
        .expect("decode");

        assert_eq!(response.reply_text(), "{\"items\":[]}");
    }

    #[test]
    fn missing_choices_give_empty_reply() {
        let response: ChatResponse = serde_json::from_value(json!({ "choices": [] })).expect("decode");
        assert_eq!(response.reply_text(), "");

        let response: ChatResponse =
            serde_json::from_value(json!({ "choices": [{ "message": null }] })).expect("decode");
        assert_eq!(response.reply_text(), "");
    }

    #[test]
    fn client_requires_a_credential() {
        let config = AppConfig::default();
        let error = OpenRouterClient::from_config(&config.llm).expect_err("no key configured");
        assert_eq!(error, LlmError::MissingCredential);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-or-test".to_string().into());
        config.llm.base_url = "https://openrouter.ai/api/v1/".to_string();

        let client = OpenRouterClient::from_config(&config.llm).expect("client builds");
        assert_eq!(client.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    }
}
