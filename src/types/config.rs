use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::error::ClientError;

const DEFAULT_CREDENTIALS_PATH: &str = "../../fabric-samples-2.3/test-network/organizations/peerOrganizations/org1.example.com/users/User1@org1.example.com/msp";
/// fabric-samples ships only a YAML profile here. The TOML profile (`gateway_peer` plus
/// `[peers.<name>] url`) has to be written next to it or set through `connection_profile`.
const DEFAULT_CONNECTION_PROFILE: &str = "../../fabric-samples-2.3/test-network/organizations/peerOrganizations/org1.example.com/connection-org1.toml";
const DEFAULT_WALLET_PATH: &str = "wallet";
const DEFAULT_KEYSTORE_PATH: &str = "keystore";
const DEFAULT_MSP_ID: &str = "Org1MSP";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Client settings. Every field is optional; a missing one falls back to the test network layout.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ClientConfig {
    pub credentials_path: Option<PathBuf>,
    pub connection_profile: Option<PathBuf>,
    pub wallet_path: Option<PathBuf>,
    pub keystore_path: Option<PathBuf>,
    pub msp_id: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        let config_file_string = fs::read_to_string(path).map_err(|source| ClientError::Config {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
        toml::from_str(&config_file_string).map_err(|source| ClientError::Config {
            path: path.to_path_buf(),
            message: source.to_string(),
        })
    }

    /// MSP directory of the user: holds `signcerts/cert.pem` and a `keystore/` with the private key.
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH))
    }
    pub fn certificate_path(&self) -> PathBuf {
        self.credentials_path().join("signcerts").join("cert.pem")
    }
    pub fn private_key_dir(&self) -> PathBuf {
        self.credentials_path().join("keystore")
    }
    /// TOML connection profile. Must be supplied by the operator, see `DEFAULT_CONNECTION_PROFILE`.
    pub fn connection_profile(&self) -> PathBuf {
        self.connection_profile.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONNECTION_PROFILE))
    }
    pub fn wallet_path(&self) -> PathBuf {
        self.wallet_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_WALLET_PATH))
    }
    pub fn keystore_path(&self) -> PathBuf {
        self.keystore_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_KEYSTORE_PATH))
    }
    pub fn msp_id(&self) -> String {
        self.msp_id.clone().unwrap_or_else(|| DEFAULT_MSP_ID.to_string())
    }
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS))
    }
}
