use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid wallet label {0:?}")]
    InvalidLabel(String),

    #[error("identity {0} is not present in the wallet")]
    IdentityNotFound(String),

    #[error("malformed wallet entry {path}: {source}")]
    WalletEntry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not decode transport key: {0}")]
    TransportKey(String),

    #[error("invalid connection profile: {0}")]
    Profile(String),

    #[error("invalid peer endpoint {0:?}")]
    InvalidEndpoint(String),

    #[error("could not dial the gateway peer: {0}")]
    Dial(String),

    #[error("gateway peer did not answer within {0:?}")]
    Timeout(Duration),

    #[error("gateway session is closed")]
    Disconnected,

    #[error("request to gateway peer failed: {0}")]
    Request(String),

    #[error("gateway rejected the proposal: {0}")]
    Rejected(String),
}

impl GatewayError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GatewayError::Io { path: path.into(), source }
    }
}
