use sha2::{Digest, Sha256};

pub use bytes::Bytes;
pub use client::Client;
pub use gateway::{Contract, Gateway, GatewayOptions, Network};
pub use types::ConnectionProfile;
pub use types::Creator;
pub use types::Endpoint;
pub use types::PeerConfig;
pub use types::FileSystemWallet;
pub use types::GatewayError;
pub use types::GatewayRequest;
pub use types::GatewayResponse;
pub use types::Proposal;
pub use types::TransportKey;
pub use types::X509Identity;

mod behaviour;
mod client;
mod connection;
mod gateway;
mod types;

/// Transaction id of a proposal: hex encoded sha256 over the nonce and the creator's identity.
pub fn transaction_id(nonce: &[u8], creator: &Creator) -> String {
    let mut sha256_hasher = Sha256::new();

    sha256_hasher.update(nonce);
    sha256_hasher.update(creator.msp_id.as_bytes());
    sha256_hasher.update(creator.certificate.as_bytes());
    hex::encode(sha256_hasher.finalize())
}
