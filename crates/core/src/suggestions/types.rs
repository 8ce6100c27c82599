//! Types shared by the suggestion pipeline

use serde::{Deserialize, Serialize};

use crate::invoicing::LineItem;

/// One user action asking for invoice content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    /// Free-text description of the job being invoiced
    pub context: String,
    /// Name of the issuing business, interpolated into the prompt
    #[serde(default)]
    pub business_name: String,
}

impl SuggestionRequest {
    pub fn new(context: impl Into<String>, business_name: impl Into<String>) -> Self {
        Self { context: context.into(), business_name: business_name.into() }
    }

    /// Business name to show the model, never blank.
    pub fn business_label(&self) -> &str {
        let trimmed = self.business_name.trim();
        if trimmed.is_empty() {
            super::DEFAULT_BUSINESS_NAME
        } else {
            trimmed
        }
    }
}

/// Where the suggested lines came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Ai,
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Fallback => "fallback",
        }
    }
}

/// Result handed back to the caller: always a usable draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionOutcome {
    pub items: Vec<LineItem>,
    pub provenance: Provenance,
    /// Model identifier, set when the items came from the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Why a fallback was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SuggestionOutcome {
    pub fn from_model(items: Vec<LineItem>, model: impl Into<String>) -> Self {
        Self { items, provenance: Provenance::Ai, model: Some(model.into()), note: None }
    }

    pub fn from_fallback(items: Vec<LineItem>, note: impl Into<String>) -> Self {
        Self { items, provenance: Provenance::Fallback, model: None, note: Some(note.into()) }
    }
}
