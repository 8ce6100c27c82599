use std::process::ExitCode;

fn main() -> ExitCode {
    fatoura_cli::run()
}
