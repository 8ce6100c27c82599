use anyhow::{Context, Result};
use fatoura_agent::{CompletionSettings, SuggestionError, SuggestionService};
use fatoura_core::config::{AppConfig, LoadOptions};
use fatoura_core::format::format_amount;
use fatoura_core::invoicing::aggregate;
use fatoura_core::suggestions::{SuggestionOutcome, SuggestionRequest};
use serde_json::{json, Value};

use super::{CommandResult, EXIT_CONFIG_INVALID, EXIT_INVALID_INPUT, EXIT_RUNTIME_FAILURE};

const COMMAND: &str = "suggest";

pub fn run(context: &str, business: &str, offline: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                error.to_string(),
                EXIT_CONFIG_INVALID,
            );
        }
    };

    run_with_config(&config, &SuggestionRequest::new(context, business), offline)
}

pub fn run_with_config(
    config: &AppConfig,
    request: &SuggestionRequest,
    offline: bool,
) -> CommandResult {
    let service = if offline {
        SuggestionService::new(None, CompletionSettings::from(&config.llm))
    } else {
        match SuggestionService::from_config(&config.llm) {
            Ok(service) => service,
            Err(error) => {
                return CommandResult::failure(
                    COMMAND,
                    "client_setup",
                    error.to_string(),
                    EXIT_RUNTIME_FAILURE,
                );
            }
        }
    };

    match execute(&service, request) {
        Ok(Ok(outcome)) => {
            let message = format!(
                "{} line(s) suggested ({})",
                outcome.items.len(),
                outcome.provenance.as_str()
            );
            CommandResult::success_with_data(
                COMMAND,
                message,
                Some(render_outcome(&outcome, &config.invoicing.currency)),
            )
        }
        Ok(Err(SuggestionError::InvalidRequest(message))) => {
            CommandResult::failure(COMMAND, "invalid_input", message, EXIT_INVALID_INPUT)
        }
        Err(error) => CommandResult::failure(
            COMMAND,
            "runtime",
            format!("{error:#}"),
            EXIT_RUNTIME_FAILURE,
        ),
    }
}

fn execute(
    service: &SuggestionService,
    request: &SuggestionRequest,
) -> Result<Result<SuggestionOutcome, SuggestionError>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;
    Ok(runtime.block_on(service.request_suggestions(request)))
}

fn render_outcome(outcome: &SuggestionOutcome, currency: &str) -> Value {
    let items: Vec<Value> = outcome
        .items
        .iter()
        .map(|item| {
            json!({
                "description": item.description,
                "quantite": item.quantity,
                "prix_unitaire": item.unit_price,
                "tva_rate": item.tax_rate_percent,
                "montant_ttc": item.gross_amount(),
            })
        })
        .collect();
    let totals = aggregate(&outcome.items);

    json!({
        "provenance": outcome.provenance,
        "model": outcome.model,
        "note": outcome.note,
        "items": items,
        "total_ht": totals.subtotal_net,
        "total_ttc": totals.total_gross,
        "total_ttc_display": format_amount(totals.total_gross, currency),
    })
}

#[cfg(test)]
mod tests {
    use fatoura_core::config::AppConfig;
    use fatoura_core::suggestions::SuggestionRequest;
    use serde_json::Value;

    use super::run_with_config;

    fn payload(output: &str) -> Value {
        serde_json::from_str(output).expect("command output should be valid JSON")
    }

    #[test]
    fn offline_suggestion_uses_catalog() {
        let result = run_with_config(
            &AppConfig::default(),
            &SuggestionRequest::new("formation Excel pour 8 personnes", "Cabinet Nour"),
            true,
        );

        assert_eq!(result.exit_code, 0);
        let payload = payload(&result.output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["provenance"], "fallback");
        assert_eq!(payload["data"]["items"][0]["description"], "Formation professionnelle personnalisée");
        assert_eq!(payload["data"]["total_ttc_display"], "2 261,000 TND");
    }

    #[test]
    fn blank_context_is_invalid_input() {
        let result = run_with_config(&AppConfig::default(), &SuggestionRequest::new(" ", ""), true);

        assert_eq!(result.exit_code, 4);
        let payload = payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_input");
    }
}
