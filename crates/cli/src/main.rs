//! CLI entry point: parse, dispatch, print exactly one envelope, and
//! map the error taxonomy to the process exit code in one place.

use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use voluum_types::{Envelope, ErrorBody, codes};

mod cli;
mod commands;
mod context;
mod error;
mod output;

use crate::cli::Cli;
use crate::output::PrintOptions;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let parsed = match Cli::try_parse() {
        Ok(parsed) => parsed,
        Err(parse_error) => {
            return match usage_error_envelope(&parse_error) {
                // Help and version displays are not failures.
                None => {
                    let _ = parse_error.print();
                    ExitCode::SUCCESS
                }
                Some(envelope) => emit(&envelope, &PrintOptions::default(), ExitCode::from(1)),
            };
        }
    };

    let print_options = PrintOptions::from_global(&parsed.global);
    match commands::run(&parsed).await {
        Ok(data) => emit(&Envelope::success(data, None), &print_options, ExitCode::SUCCESS),
        Err(command_error) => {
            let exit = ExitCode::from(command_error.exit_code());
            emit(&Envelope::failure(command_error.error_body()), &print_options, exit)
        }
    }
}

fn emit(envelope: &Envelope, options: &PrintOptions, exit: ExitCode) -> ExitCode {
    if let Err(write_error) = output::print_envelope(envelope, options) {
        eprintln!("voluum: failed to write output: {write_error}");
        return ExitCode::from(2);
    }
    exit
}

/// Classify a clap parse failure. Help/version displays return `None`
/// (exit 0); everything else becomes a `USAGE_ERROR` failure envelope.
fn usage_error_envelope(parse_error: &clap::Error) -> Option<Envelope> {
    match parse_error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        _ => Some(Envelope::failure(ErrorBody {
            message: parse_error.to_string(),
            code: Some(codes::USAGE_ERROR.to_string()),
            status: None,
            details: None,
        })),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
