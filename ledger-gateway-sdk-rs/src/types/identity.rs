use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use libp2p::identity::Keypair;
use libp2p::PeerId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::error::GatewayError;

const TRANSPORT_KEY_FILE: &str = "transport.key";

/// Signing credentials of a wallet user: an X.509 certificate and its private key, both PEM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X509Identity {
    pub msp_id: String,
    pub certificate: String,
    pub private_key: String,
}

impl X509Identity {
    pub fn new(msp_id: impl Into<String>, certificate: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
            certificate: certificate.into(),
            private_key: private_key.into(),
        }
    }

    pub fn creator(&self) -> Creator {
        Creator {
            msp_id: self.msp_id.clone(),
            certificate: self.certificate.clone(),
        }
    }
}

/// The public half of an identity, attached to every proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub msp_id: String,
    pub certificate: String,
}

/// Keypair used to secure the transport to the gateway peer, cached on disk.
pub struct TransportKey {
    pub key_location: PathBuf,
    pub keypair: Keypair,
}

impl TransportKey {
    pub fn load_or_generate(keystore_dir: &Path) -> Result<Self, GatewayError> {
        let key_location = keystore_dir.join(TRANSPORT_KEY_FILE);
        let keypair = get_key_pair(keystore_dir, &key_location)?;
        Ok(Self { key_location, keypair })
    }

    pub fn get_peer_id(&self) -> PeerId {
        PeerId::from(self.keypair.public())
    }
}

fn get_key_pair(keystore_dir: &Path, key_location: &Path) -> Result<Keypair, GatewayError> {
    match key_location.exists() {
        true => get_existing_key(key_location),
        false => {
            fs::create_dir_all(keystore_dir).map_err(|e| GatewayError::io(keystore_dir, e))?;
            generate_new_key(key_location)
        }
    }
}

fn get_existing_key(key_location: &Path) -> Result<Keypair, GatewayError> {
    let mut file = File::open(key_location).map_err(|e| GatewayError::io(key_location, e))?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| GatewayError::io(key_location, e))?;

    Keypair::from_protobuf_encoding(&bytes).map_err(|e| GatewayError::TransportKey(e.to_string()))
}

fn generate_new_key(key_location: &Path) -> Result<Keypair, GatewayError> {
    let key = Keypair::generate_secp256k1();
    let secret_bytes = key
        .to_protobuf_encoding()
        .map_err(|e| GatewayError::TransportKey(e.to_string()))?;

    let mut file = File::create(key_location).map_err(|e| GatewayError::io(key_location, e))?;
    file.write_all(&secret_bytes).map_err(|e| GatewayError::io(key_location, e))?;

    info!("Generated new transport key at {}", key_location.display());
    Ok(key)
}
