use fatoura_core::config::{AppConfig, LoadOptions};
use fatoura_core::suggestions::{generate_fallback, matched_rule, FALLBACK_RULES};
use serde::Serialize;

use super::{CommandResult, EXIT_DOCTOR_FAILED};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report(AppConfig::load(LoadOptions::default()));
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_DOCTOR_FAILED };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report<E: std::fmt::Display>(loaded: Result<AppConfig, E>) -> DoctorReport {
    let mut checks = Vec::new();

    match loaded {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_ai_credential(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "ai_credential",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }
    checks.push(check_fallback_catalog());

    // A missing credential is reported but does not fail readiness.
    let any_failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_failed { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_failed {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_ai_credential(config: &AppConfig) -> DoctorCheck {
    if config.llm.has_credential() {
        DoctorCheck {
            name: "ai_credential",
            status: CheckStatus::Pass,
            details: format!(
                "credential present; suggestions use `{}` at {}",
                config.llm.model, config.llm.base_url
            ),
        }
    } else {
        DoctorCheck {
            name: "ai_credential",
            status: CheckStatus::Skipped,
            details: "no API key configured; suggestions will come from the local catalog"
                .to_string(),
        }
    }
}

fn check_fallback_catalog() -> DoctorCheck {
    // Every rule must be reachable through its own keywords and yield items.
    let broken: Vec<&str> = FALLBACK_RULES
        .iter()
        .filter(|rule| {
            rule.catalog.is_empty()
                || !rule.keywords.iter().any(|keyword| {
                    matched_rule(keyword).map(|matched| matched.name) == Some(rule.name)
                })
        })
        .map(|rule| rule.name)
        .collect();

    if broken.is_empty() && !generate_fallback("").is_empty() {
        DoctorCheck {
            name: "fallback_catalog",
            status: CheckStatus::Pass,
            details: format!("{} keyword rules plus the generic catalog", FALLBACK_RULES.len()),
        }
    } else {
        DoctorCheck {
            name: "fallback_catalog",
            status: CheckStatus::Fail,
            details: format!("unreachable or empty rules: {}", broken.join(", ")),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
