use crate::args::Cli;
use fms_cli::{CLIConfiguration, CLIError, CLISession, FileSessionStore, OutputFormat, Result};
use fms_link::{FmsClient, FmsLinkTimeouts};

/// Timeouts from the config file, with CLI flags taking priority.
pub fn build_timeouts(cli: &Cli, config: &CLIConfiguration) -> FmsLinkTimeouts {
    let server = config.resolved_server();
    FmsLinkTimeouts::builder()
        .connection_timeout_secs(cli.connection_timeout.unwrap_or(server.connection_timeout))
        .request_timeout_secs(cli.timeout.unwrap_or(server.timeout))
        .build()
}

/// Output format: `--json` / `--csv`, then `--format`, then `[ui].format`.
pub fn resolve_format(cli: &Cli, config: &CLIConfiguration) -> Result<OutputFormat> {
    if cli.json {
        return Ok(OutputFormat::Json);
    }
    if cli.csv {
        return Ok(OutputFormat::Csv);
    }
    match cli.format {
        Some(format) => Ok(format),
        None => config.resolved_ui().format.parse(),
    }
}

/// Endpoint URL: `--url`, then `[server].url`.
pub fn resolve_url(cli: &Cli, config: &CLIConfiguration) -> Result<String> {
    cli.url
        .clone()
        .or_else(|| config.server.as_ref().and_then(|s| s.url.clone()))
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            CLIError::ConfigurationError(
                "No endpoint URL configured. Pass --url or set [server].url in the config file"
                    .into(),
            )
        })
}

pub fn create_client(cli: &Cli, config: &CLIConfiguration) -> Result<FmsClient> {
    let url = resolve_url(cli, config)?;
    let client = FmsClient::builder()
        .base_url(url)
        .timeouts(build_timeouts(cli, config))
        .user_agent(format!("fms-cli/{}", fms_cli::CLI_VERSION))
        .build()?;
    Ok(client)
}

/// Session store at `--session-file`, then `[session].store_path`, then the default location.
pub fn open_session_store(cli: &Cli, config: &CLIConfiguration) -> Result<FileSessionStore> {
    let path = cli
        .session_file
        .clone()
        .or_else(|| config.session_store_path())
        .unwrap_or_else(FileSessionStore::default_path);
    log::debug!("[CLI] Session file: {}", path.display());
    Ok(FileSessionStore::with_path(path)?)
}

pub fn create_session(
    cli: &Cli,
    config: &CLIConfiguration,
    store: FileSessionStore,
) -> Result<CLISession<FileSessionStore>> {
    let client = create_client(cli, config)?;
    let format = resolve_format(cli, config)?;
    let color = !cli.no_color && config.resolved_ui().color;

    Ok(CLISession::new(client, store, config.clone(), format, color)
        .with_animations(!cli.no_spinner))
}
