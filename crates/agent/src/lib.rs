//! Suggestion orchestration
//!
//! This crate wires the deterministic suggestion pipeline of `fatoura-core`
//! to an external language model:
//! - `llm` defines the completion contract and its error taxonomy
//! - `openrouter` implements it over the OpenRouter chat-completions API
//! - `prompt` renders the instruction sent for each request
//! - `service` runs the single-attempt call, validation and fallback
//!
//! The model only proposes lines. Every number it returns is defaulted and
//! clamped by the core validator, and any failure is answered from the
//! keyword catalog, so callers always receive a usable draft.

pub mod llm;
pub mod openrouter;
pub mod prompt;
pub mod service;

pub use llm::{CompletionRequest, LlmClient, LlmError, ScriptedLlmClient};
pub use openrouter::OpenRouterClient;
pub use service::{CompletionSettings, SuggestionError, SuggestionService};
