use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::console::Terminal;
use crate::dispatcher::Dispatcher;
use crate::types::{Args, ClientConfig, ClientError};

mod console;
mod dispatcher;
mod ledger;
mod session;
mod types;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match get_client_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    info!("============ application starts ============");
    info!("-> Enter exit at any prompt to leave the application");

    let mut terminal = match Terminal::new() {
        Ok(terminal) => terminal,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let session = match session::establish(&mut terminal, &config).await {
        Ok(session) => session,
        Err(ClientError::Exit) => {
            info!("============ application ends ============");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let cleanup_paths = vec![config.wallet_path(), config.keystore_path()];
    let mut dispatcher = Dispatcher::new(terminal, session.contract.clone(), session.user_label, cleanup_paths);
    let outcome = dispatcher.run().await;

    session.gateway.close().await;
    match outcome {
        Ok(()) | Err(ClientError::Exit) => {
            info!("============ application ends ============");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn get_client_config() -> Result<ClientConfig, ClientError> {
    let args = Args::parse();
    match args.config {
        None => Ok(ClientConfig::empty()),
        Some(config_file_location) => ClientConfig::from_file(&config_file_location),
    }
}
