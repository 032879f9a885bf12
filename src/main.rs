//! ipub CLI entry point.
//!
//! Handles command-line argument parsing, error display, and command
//! execution. Any unhandled error aborts the invocation with a non-zero
//! status and a diagnostic; there is no partial-result output on failure.

use anyhow::Result;
use clap::Parser;
use ipub::cli;
use ipub::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to a user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
