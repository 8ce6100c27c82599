use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

/// One text-completion call.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("no API credential is configured for the model provider")]
    MissingCredential,
    #[error("model provider request failed: {0}")]
    Transport(String),
    #[error("model provider returned status {status}")]
    Status { status: u16, body: String },
    #[error("model provider response could not be decoded: {0}")]
    Decode(String),
}

impl LlmError {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "non_success_status",
            Self::Decode(_) => "decode",
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the reply text, which may be empty.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Replays a fixed answer. Used for offline runs and tests.
#[derive(Debug)]
pub struct ScriptedLlmClient {
    reply: Result<String, LlmError>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlmClient {
    pub fn replying(text: impl Into<String>) -> Self {
        Self { reply: Ok(text.into()), calls: Mutex::new(Vec::new()) }
    }

    pub fn failing(error: LlmError) -> Self {
        Self { reply: Err(error), calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        self.reply.clone()
    }
}
