use std::env;
use std::fs;
use std::path::Path;

use fatoura_core::config::{resolve_config_path, AppConfig, LoadOptions, OPENROUTER_API_KEY_ENV};
use secrecy::ExposeSecret;
use toml::Value;

struct ConfigField<'a> {
    key_path: &'static str,
    value: String,
    env_keys: &'a [&'a str],
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<ConfigField<'static>> {
    let api_key = match &config.llm.api_key {
        Some(key) => redact_token(key.expose_secret()),
        None => "<unset>".to_string(),
    };

    vec![
        ConfigField {
            key_path: "llm.api_key",
            value: api_key,
            env_keys: &["FATOURA_LLM_API_KEY", OPENROUTER_API_KEY_ENV],
        },
        ConfigField {
            key_path: "llm.base_url",
            value: config.llm.base_url.clone(),
            env_keys: &["FATOURA_LLM_BASE_URL"],
        },
        ConfigField {
            key_path: "llm.model",
            value: config.llm.model.clone(),
            env_keys: &["FATOURA_LLM_MODEL"],
        },
        ConfigField {
            key_path: "llm.max_tokens",
            value: config.llm.max_tokens.to_string(),
            env_keys: &["FATOURA_LLM_MAX_TOKENS"],
        },
        ConfigField {
            key_path: "llm.temperature",
            value: config.llm.temperature.to_string(),
            env_keys: &["FATOURA_LLM_TEMPERATURE"],
        },
        ConfigField {
            key_path: "llm.timeout_secs",
            value: config.llm.timeout_secs.to_string(),
            env_keys: &["FATOURA_LLM_TIMEOUT_SECS"],
        },
        ConfigField {
            key_path: "llm.app_title",
            value: config.llm.app_title.clone(),
            env_keys: &["FATOURA_LLM_APP_TITLE"],
        },
        ConfigField {
            key_path: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["FATOURA_SERVER_BIND_ADDRESS"],
        },
        ConfigField {
            key_path: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["FATOURA_SERVER_PORT"],
        },
        ConfigField {
            key_path: "invoicing.currency",
            value: config.invoicing.currency.clone(),
            env_keys: &["FATOURA_INVOICING_CURRENCY"],
        },
        ConfigField {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["FATOURA_LOGGING_LEVEL", "FATOURA_LOG_LEVEL"],
        },
        ConfigField {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["FATOURA_LOGGING_FORMAT", "FATOURA_LOG_FORMAT"],
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
