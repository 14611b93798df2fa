use std::time::Duration;

use libp2p::core::upgrade::Version;
use libp2p::identity::Keypair;
use libp2p::multiaddr::Protocol;
use libp2p::swarm::DialError;
use libp2p::{noise, swarm, tcp, yamux, Multiaddr, PeerId, Swarm, Transport};
use tokio::net::lookup_host;

use crate::behaviour::GatewayBehaviour;
use crate::types::error::GatewayError;
use crate::types::profile::Endpoint;

pub struct Connection;

impl Connection {
    /// Resolves the endpoint host and returns the first address as a TCP multiaddress.
    pub async fn resolve(endpoint: &Endpoint) -> Result<Multiaddr, GatewayError> {
        let mut addresses = lookup_host((endpoint.host.as_str(), endpoint.port))
            .await
            .map_err(|error| GatewayError::Dial(format!("could not resolve {}: {}", endpoint.host, error)))?;

        let socket_address = addresses
            .next()
            .ok_or_else(|| GatewayError::Dial(format!("{} did not resolve to any address", endpoint.host)))?;

        Ok(Multiaddr::from(socket_address.ip()).with(Protocol::Tcp(socket_address.port())))
    }

    pub fn connect_swarm(keypair: &Keypair, address: Multiaddr, request_timeout: Duration) -> Result<Swarm<GatewayBehaviour>, GatewayError> {
        let behaviour = GatewayBehaviour::new(request_timeout);
        let peer_id = PeerId::from(keypair.public());

        let noise_config = noise::Config::new(keypair)
            .map_err(|error| GatewayError::Dial(format!("could not initialise noise: {}", error)))?;
        let transport = tcp::tokio::Transport::default().upgrade(Version::V1).authenticate(noise_config).multiplex(yamux::Config::default()).boxed();
        // Connections stay open while the operator sits at a prompt.
        let swarm_config = swarm::Config::with_tokio_executor().with_idle_connection_timeout(Duration::from_secs(u64::MAX));
        let mut swarm = Swarm::new(transport, behaviour, peer_id, swarm_config);

        swarm
            .dial(address.clone())
            .map_err(|dial_error: DialError| GatewayError::Dial(format!("{}: {}", address, dial_error)))?;
        tracing::debug!("Dialing gateway peer at {}", address);

        Ok(swarm)
    }
}
