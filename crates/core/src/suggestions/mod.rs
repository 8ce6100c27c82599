//! Invoice content suggestions
//!
//! Turns untrusted text from an external language model into well-formed
//! invoice lines, and provides the deterministic keyword catalog used when
//! that model is unavailable or answers with something unusable.

pub mod fallback;
mod types;
pub mod validator;

pub use fallback::{generate as generate_fallback, matched_rule, FallbackRule, FALLBACK_RULES};
pub use types::*;
pub use validator::{extract_json_object, to_wire_json, validate, ParseFailure};

/// Business name used in prompts when the caller supplies none.
pub const DEFAULT_BUSINESS_NAME: &str = "Entreprise";
