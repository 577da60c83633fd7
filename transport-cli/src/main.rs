//! Entry point for the `transport` command.
#![forbid(unsafe_code)]

use std::process::ExitCode;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() -> ExitCode {
    match transport_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(transport_cli::CliError::ArgumentParsing(err)) => {
            // clap renders help and version output through its error type.
            match err.print() {
                Ok(()) if err.use_stderr() => ExitCode::FAILURE,
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Err(err) => {
            eprintln!("transport: {err}");
            ExitCode::FAILURE
        }
    }
}
