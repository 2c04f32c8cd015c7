//! Error handling and display for the CLI.

use colored::Colorize;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("No card selected. Run `wj card use <card-id>` to pick one.")]
    NoCard,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(#[from] runtrack_core::ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] runtrack_store::StorageError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    // Validation failures are user input problems, not faults.
    if let Some(CliError::Validation(v)) = err.downcast_ref::<CliError>() {
        eprintln!("{} {}", "Warning:".yellow().bold(), v);
        return;
    }

    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::NoCard => {
                eprintln!(
                    "\n{}",
                    "Hint: Run `wj card use <card-id>` to select a card.".yellow()
                );
            }
            CliError::NotFound(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Run `wj list` to see the trackers on this card.".yellow()
                );
            }
            CliError::Storage(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: The card storage file may be damaged. Run `wj card show` for its path."
                        .yellow()
                );
            }
            _ => {}
        }
    }
}
