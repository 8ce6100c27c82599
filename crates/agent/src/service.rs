use std::sync::Arc;

use fatoura_core::config::LlmConfig;
use fatoura_core::errors::ApplicationError;
use fatoura_core::suggestions::{
    generate_fallback, matched_rule, validate, SuggestionOutcome, SuggestionRequest,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{CompletionRequest, LlmClient, LlmError};
use crate::openrouter::OpenRouterClient;
use crate::prompt::build_prompt;

pub const FALLBACK_NOTE: &str = "Suggestions générées localement suite à une erreur IA";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SuggestionError {
    #[error("invalid suggestion request: {0}")]
    InvalidRequest(String),
}

impl From<SuggestionError> for ApplicationError {
    fn from(value: SuggestionError) -> Self {
        match value {
            SuggestionError::InvalidRequest(message) => Self::InvalidRequest(message),
        }
    }
}

/// Model parameters sent with every completion.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&LlmConfig> for CompletionSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Asks the model for invoice lines once, and answers from the keyword
/// catalog whenever that does not produce a structurally valid reply.
#[derive(Clone)]
pub struct SuggestionService {
    client: Option<Arc<dyn LlmClient>>,
    settings: CompletionSettings,
}

impl SuggestionService {
    pub fn new(client: Option<Arc<dyn LlmClient>>, settings: CompletionSettings) -> Self {
        Self { client, settings }
    }

    /// Builds the OpenRouter-backed service. Without a credential every
    /// request is answered from the fallback catalog.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client: Option<Arc<dyn LlmClient>> = match OpenRouterClient::from_config(config) {
            Ok(client) => Some(Arc::new(client)),
            Err(LlmError::MissingCredential) => None,
            Err(error) => return Err(error),
        };
        Ok(Self::new(client, CompletionSettings::from(config)))
    }

    pub fn has_model(&self) -> bool {
        self.client.is_some()
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    pub async fn request_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> Result<SuggestionOutcome, SuggestionError> {
        if request.context.trim().is_empty() {
            return Err(SuggestionError::InvalidRequest("context is required".to_string()));
        }

        let Some(client) = &self.client else {
            return Ok(self.fallback(request, LlmError::MissingCredential.reason_code()));
        };

        let completion = CompletionRequest {
            model: self.settings.model.clone(),
            prompt: build_prompt(request),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let reply = match client.complete(&completion).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(
                    event_name = "suggestions.external_call.failed",
                    reason = error.reason_code(),
                    error = %error,
                    model = %self.settings.model,
                    "model call failed"
                );
                return Ok(self.fallback(request, error.reason_code()));
            }
        };

        if reply.trim().is_empty() {
            return Ok(self.fallback(request, "empty_reply"));
        }

        match validate(&reply) {
            Ok(items) => {
                info!(
                    event_name = "suggestions.ai.accepted",
                    item_count = items.len(),
                    model = %self.settings.model,
                    "model suggestions validated"
                );
                Ok(SuggestionOutcome::from_model(items, self.settings.model.clone()))
            }
            Err(failure) => {
                warn!(
                    event_name = "suggestions.parse.failed",
                    reason = failure.reason_code(),
                    error = %failure,
                    "model reply could not be parsed"
                );
                Ok(self.fallback(request, failure.reason_code()))
            }
        }
    }

    fn fallback(&self, request: &SuggestionRequest, reason: &'static str) -> SuggestionOutcome {
        let rule = matched_rule(&request.context).map(|rule| rule.name).unwrap_or("generic");
        info!(
            event_name = "suggestions.fallback.used",
            reason,
            rule,
            "serving fallback suggestions"
        );
        SuggestionOutcome::from_fallback(generate_fallback(&request.context), FALLBACK_NOTE)
    }
}
