// src/main.rs
use clap::Parser;
use env_logger::Builder;
use log::{error, info};
use networth_client::cli::{run, Cli, CliError, Commands};
use networth_client::config::Config;
use networth_client::{ApiClient, FileSessionStore, Session};
use std::process::ExitCode;

async fn execute(command: Commands, config: &Config) -> Result<(), CliError> {
    let session = Session::new(FileSessionStore::new(&config.session_file));
    let api = ApiClient::from_config(config)?.with_token(session.access_token()?);
    let mut stdout = std::io::stdout();
    run(command, &session, &api, &mut stdout).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };
    Builder::new()
        .filter_level(config.log_level)
        .format_timestamp_secs()
        .init();

    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    info!("Using backend at {}", config.api_url);

    match execute(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
