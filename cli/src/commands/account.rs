use crate::args::Cli;
use crate::connect::{create_session, open_session_store};
use colored::*;
use fms_cli::gate::{describe_user, SessionGate};
use fms_cli::{CLIConfiguration, CLIError, FileSessionStore, Result};
use std::io::{self, Write};

/// Handle `--whoami`, `--logout` and `--login`. Returns `true` when one ran.
pub async fn handle_account(cli: &Cli, config: &CLIConfiguration) -> Result<bool> {
    if cli.whoami {
        let store = open_session_store(cli, config)?;
        println!("{}", whoami(store));
        return Ok(true);
    }

    if cli.logout {
        let store = open_session_store(cli, config)?;
        logout(store);
        println!("Logged out");
        return Ok(true);
    }

    if cli.login {
        login(cli, config).await?;
        return Ok(true);
    }

    Ok(false)
}

/// Stored session user, or "Not logged in".
pub fn whoami(store: FileSessionStore) -> String {
    let mut gate = SessionGate::new(store);
    match gate.restore() {
        Some(user) => describe_user(user),
        None => "Not logged in".to_string(),
    }
}

pub fn logout(store: FileSessionStore) {
    let mut gate = SessionGate::new(store);
    gate.logout();
}

async fn login(cli: &Cli, config: &CLIConfiguration) -> Result<()> {
    let username = match &cli.username {
        Some(user) => user.clone(),
        None => {
            print!("Username: ");
            io::stdout().flush()?;
            let mut input = String::new();
            io::stdin()
                .read_line(&mut input)
                .map_err(|e| CLIError::FileError(format!("Failed to read username: {}", e)))?;
            input.trim().to_string()
        }
    };

    let password = match &cli.password {
        Some(pass) => pass.clone(),
        None => rpassword::prompt_password("Password: ")
            .map_err(|e| CLIError::FileError(format!("Failed to read password: {}", e)))?,
    };

    let store = open_session_store(cli, config)?;
    let mut session = create_session(cli, config, store)?;
    session.login(&username, &password).await?;

    if let Some(user) = session.gate().user() {
        let welcome = format!("✓ Welcome, {}!", user.display_name());
        if cli.no_color {
            println!("{}", welcome);
        } else {
            println!("{}", welcome.green());
        }
        println!("{}", describe_user(user));
    }
    Ok(())
}
