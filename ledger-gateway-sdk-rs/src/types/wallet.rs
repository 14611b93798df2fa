use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::error::GatewayError;
use crate::types::identity::X509Identity;

const ENTRY_EXTENSION: &str = "id";
const X509_TYPE: &str = "X.509";

/// A wallet that keeps one JSON file per labelled identity inside a directory.
#[derive(Debug, Clone)]
pub struct FileSystemWallet {
    path: PathBuf,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletEntry {
    credentials: Credentials,
    msp_id: String,
    #[serde(rename = "type")]
    identity_type: String,
    version: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Credentials {
    certificate: String,
    private_key: String,
}

impl FileSystemWallet {
    /// Opens the wallet directory, creating it when missing.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, GatewayError> {
        let path = path.into();
        fs::create_dir_all(&path).map_err(|e| GatewayError::io(&path, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, label: &str) -> bool {
        match self.entry_path(label) {
            Ok(entry_path) => entry_path.is_file(),
            Err(_) => false,
        }
    }

    pub fn put(&self, label: &str, identity: &X509Identity) -> Result<(), GatewayError> {
        let entry_path = self.entry_path(label)?;
        let entry = WalletEntry {
            credentials: Credentials {
                certificate: identity.certificate.clone(),
                private_key: identity.private_key.clone(),
            },
            msp_id: identity.msp_id.clone(),
            identity_type: X509_TYPE.to_string(),
            version: 1,
        };
        let json = serde_json::to_vec_pretty(&entry).map_err(|source| GatewayError::WalletEntry {
            path: entry_path.clone(),
            source,
        })?;
        fs::write(&entry_path, json).map_err(|e| GatewayError::io(&entry_path, e))
    }

    pub fn get(&self, label: &str) -> Result<X509Identity, GatewayError> {
        let entry_path = self.entry_path(label)?;
        if !entry_path.is_file() {
            return Err(GatewayError::IdentityNotFound(label.to_string()));
        }
        let raw = fs::read(&entry_path).map_err(|e| GatewayError::io(&entry_path, e))?;
        let entry: WalletEntry = serde_json::from_slice(&raw).map_err(|source| GatewayError::WalletEntry {
            path: entry_path.clone(),
            source,
        })?;

        Ok(X509Identity {
            msp_id: entry.msp_id,
            certificate: entry.credentials.certificate,
            private_key: entry.credentials.private_key,
        })
    }

    /// Labels name a file inside the wallet directory, so they must be non-empty and free of path separators.
    pub fn is_valid_label(label: &str) -> bool {
        !label.is_empty() && !label.contains(['/', '\\']) && label != "." && label != ".."
    }

    fn entry_path(&self, label: &str) -> Result<PathBuf, GatewayError> {
        if !Self::is_valid_label(label) {
            return Err(GatewayError::InvalidLabel(label.to_string()));
        }
        Ok(self.path.join(format!("{label}.{ENTRY_EXTENSION}")))
    }
}
