//! pact - Local-first contract lifecycle management

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = pact_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
