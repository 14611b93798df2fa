use std::io;
use std::path::PathBuf;

use ledger_gateway_sdk_rs::GatewayError;
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The operator asked to leave. Not a failure.
    #[error("exit requested")]
    Exit,

    #[error("terminal error: {0}")]
    Terminal(#[from] ReadlineError),

    #[error("could not load config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("could not read credentials at {path}: {source}")]
    Credentials {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("keystore folder {path} should contain exactly one file, found {found}")]
    KeystoreLayout { path: PathBuf, found: usize },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A submit or evaluate call that failed while dispatching one command.
    #[error("{0}")]
    Ledger(GatewayError),

    #[error("failed to parse JSON: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("could not remove {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ClientError {
    /// Only a failed ledger call lets the command loop carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ClientError::Ledger(_))
    }
}
