//! FMS CLI - Terminal client for the Office FMS workflow
//!
//! # Usage
//!
//! ```bash
//! # Interactive shell (prompts for login when no session is stored)
//! fms -u https://script.google.com/macros/s/<deployment>/exec
//!
//! # Log in once, then run commands against the stored session
//! fms --login --username asha
//! fms -c "open lifting"
//!
//! # Run a command file with JSON output
//! fms --json --file approvals.fms
//! ```

use clap::Parser;
use env_logger::Env;

use fms_cli::{CLIConfiguration, CLIError, Result};

mod args;
mod commands;
mod connect;

use args::Cli;
use commands::account::handle_account;
use connect::{create_session, open_session_store};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if cli.file.is_some() && cli.command.is_some() {
        return Err(CLIError::ConfigurationError(
            "Cannot specify both --file and --command".into(),
        ));
    }

    let config = CLIConfiguration::load(&cli.config)?;

    if handle_account(&cli, &config).await? {
        return Ok(());
    }

    let store = open_session_store(&cli, &config)?;
    let mut session = create_session(&cli, &config, store)?;

    match (cli.file.as_ref(), cli.command.as_deref()) {
        (Some(file), None) => {
            let script = std::fs::read_to_string(file).map_err(|e| {
                CLIError::FileError(format!("Failed to read {}: {}", file.display(), e))
            })?;
            session.execute_batch(&script).await?;
        }

        (None, Some(command)) => {
            session.execute(command).await?;
        }

        _ => {
            session.run_interactive().await?;
        }
    }

    Ok(())
}
