//! Entry point for the command-line interface.
//!
//! Logging is initialised before argument parsing so every command can emit
//! structured diagnostics on stderr.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use waymark_cli::{
    CliError,
    logging::{self, LoggingError},
};

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match waymark_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            tracing::error!(error = %err, "command execution failed");
            ExitCode::FAILURE
        }
    }
}

fn report_logging_init_error(err: &LoggingError) {
    eprintln!("waymark: failed to initialise logging: {err}");
}
