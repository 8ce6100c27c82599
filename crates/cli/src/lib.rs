pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "fatoura",
    about = "Fatoura operator CLI",
    long_about = "Inspect configuration, check suggestion readiness, and draft invoice lines from a job description.",
    after_help = "Examples:\n  fatoura doctor --json\n  fatoura config\n  fatoura suggest --context \"site web vitrine\" --business \"Atelier Médina\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and AI credential readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Suggest invoice lines for a job description")]
    Suggest {
        #[arg(long, help = "Free-text description of the work to invoice")]
        context: String,
        #[arg(long, default_value = "", help = "Issuing business name used in the prompt")]
        business: String,
        #[arg(long, help = "Skip the model and answer from the local catalog")]
        offline: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Suggest { context, business, offline } => {
            commands::suggest::run(&context, &business, offline)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
