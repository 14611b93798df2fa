use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ledger_gateway_sdk_rs::{FileSystemWallet, X509Identity};
use tracing::info;

use crate::types::{ClientConfig, ClientError};

/// Where the user's enrolment material is read from on first use of a label.
#[derive(Debug, Clone)]
pub struct CredentialSource {
    pub certificate_path: PathBuf,
    /// Must hold exactly one file: the private key.
    pub private_key_dir: PathBuf,
    pub msp_id: String,
}

impl From<&ClientConfig> for CredentialSource {
    fn from(config: &ClientConfig) -> Self {
        Self {
            certificate_path: config.certificate_path(),
            private_key_dir: config.private_key_dir(),
            msp_id: config.msp_id(),
        }
    }
}

/// Adds `label` to the wallet unless it is already there.
pub fn ensure_identity(wallet: &FileSystemWallet, label: &str, source: &CredentialSource) -> Result<(), ClientError> {
    if wallet.exists(label) {
        info!("-> User {} already exists", label);
        return Ok(());
    }

    let identity = read_identity(source)?;
    wallet.put(label, &identity)?;
    info!("-> Successfully added user {} to wallet", label);
    Ok(())
}

fn read_identity(source: &CredentialSource) -> Result<X509Identity, ClientError> {
    let certificate = read_credential(&source.certificate_path)?;

    let key_dir = &source.private_key_dir;
    let entries = fs::read_dir(key_dir)
        .and_then(|entries| entries.collect::<Result<Vec<_>, io::Error>>())
        .map_err(|source| ClientError::Credentials { path: key_dir.clone(), source })?;
    if entries.len() != 1 {
        return Err(ClientError::KeystoreLayout {
            path: key_dir.clone(),
            found: entries.len(),
        });
    }
    let private_key = read_credential(&entries[0].path())?;

    Ok(X509Identity::new(source.msp_id.clone(), certificate, private_key))
}

fn read_credential(path: &Path) -> Result<String, ClientError> {
    fs::read_to_string(path).map_err(|source| ClientError::Credentials {
        path: path.to_path_buf(),
        source,
    })
}
