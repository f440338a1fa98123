use clap::Parser;
use fms_cli::OutputFormat;
use std::path::PathBuf;

// Version string assembled at compile time from build.rs output
macro_rules! version_string {
    () => {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nCommit: ",
            env!("GIT_COMMIT_HASH"),
            " (",
            env!("GIT_BRANCH"),
            ")\nBuilt: ",
            env!("BUILD_DATE")
        )
    };
}

/// FMS CLI - Terminal client for the Office FMS workflow
#[derive(Parser, Debug)]
#[command(name = "fms")]
#[command(author = "Office FMS Team")]
#[command(version = version_string!())]
#[command(about = "Interactive terminal for the Office FMS indent workflow", long_about = None)]
pub struct Cli {
    /// Endpoint URL of the FMS script deployment
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// Configuration file path
    #[arg(long = "config", default_value = "~/.fms/config.toml")]
    pub config: PathBuf,

    /// Session file holding the logged-in user (overrides the config file)
    #[arg(long = "session-file")]
    pub session_file: Option<PathBuf>,

    /// Request deadline in seconds (overrides the config file)
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Connection timeout in seconds (TCP + TLS handshake)
    #[arg(long = "connection-timeout", value_name = "SECONDS")]
    pub connection_timeout: Option<u64>,

    /// Output format
    #[arg(long = "format")]
    pub format: Option<OutputFormat>,

    /// Enable JSON output (shorthand for --format=json)
    #[arg(long = "json", conflicts_with_all = ["format", "csv"])]
    pub json: bool,

    /// Enable CSV output (shorthand for --format=csv)
    #[arg(long = "csv", conflicts_with = "format")]
    pub csv: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Disable spinners/animations
    #[arg(long = "no-spinner")]
    pub no_spinner: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Log in and store the session, then exit
    #[arg(long = "login")]
    pub login: bool,

    /// Username for --login (prompts when missing)
    #[arg(long = "username")]
    pub username: Option<String>,

    /// Password for --login (prompts when missing)
    #[arg(long = "password")]
    pub password: Option<String>,

    /// Clear the stored session and exit
    #[arg(long = "logout")]
    pub logout: bool,

    /// Show the stored session user and exit
    #[arg(long = "whoami")]
    pub whoami: bool,

    /// Execute shell commands from file and exit
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Execute one shell command and exit
    #[arg(short = 'c', long = "command")]
    pub command: Option<String>,
}
