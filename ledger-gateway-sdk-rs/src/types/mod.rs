pub mod error;
pub mod identity;
pub mod profile;
pub mod proposal;
pub mod wallet;

pub use error::GatewayError;
pub use identity::{Creator, TransportKey, X509Identity};
pub use profile::{ConnectionProfile, Endpoint, PeerConfig};
pub use proposal::{ChannelRequest, GatewayRequest, GatewayResponse, Proposal};
pub use wallet::FileSystemWallet;
