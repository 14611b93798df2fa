use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::error::GatewayError;

const LOCALHOST: &str = "127.0.0.1";

/// Describes how to reach the network: which peer acts as the gateway and where every peer lives.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConnectionProfile {
    pub name: Option<String>,
    pub gateway_peer: String,
    pub peers: BTreeMap<String, PeerConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PeerConfig {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl ConnectionProfile {
    pub fn from_file(path: &Path) -> Result<Self, GatewayError> {
        let raw = fs::read_to_string(path).map_err(|e| GatewayError::io(path, e))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, GatewayError> {
        toml::from_str(raw).map_err(|e| GatewayError::Profile(e.to_string()))
    }

    /// Endpoint of the gateway peer. Discovered hosts are mapped to the loopback address when the
    /// network runs on this machine.
    pub fn gateway_endpoint(&self, discovery_as_localhost: bool) -> Result<Endpoint, GatewayError> {
        let peer = self
            .peers
            .get(&self.gateway_peer)
            .ok_or_else(|| GatewayError::Profile(format!("gateway peer {} has no entry under [peers]", self.gateway_peer)))?;

        let mut endpoint = Endpoint::parse(&peer.url)?;
        if discovery_as_localhost {
            endpoint.host = LOCALHOST.to_string();
        }
        Ok(endpoint)
    }
}

impl Endpoint {
    /// Parses `[scheme://]host:port`.
    pub fn parse(url: &str) -> Result<Self, GatewayError> {
        let authority = match url.split_once("://") {
            Some((_scheme, rest)) => rest,
            None => url,
        };
        let authority = authority.trim_end_matches('/');

        let (host, port) = authority
            .rsplit_once(':')
            .ok_or_else(|| GatewayError::InvalidEndpoint(url.to_string()))?;
        if host.is_empty() {
            return Err(GatewayError::InvalidEndpoint(url.to_string()));
        }
        let port: u16 = port.parse().map_err(|_| GatewayError::InvalidEndpoint(url.to_string()))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
name = "test-network-org1"
gateway_peer = "peer0.org1.example.com"

[peers."peer0.org1.example.com"]
url = "grpcs://peer0.org1.example.com:7051"

[peers."peer1.org1.example.com"]
url = "peer1.org1.example.com:8051"
"#;

    #[test]
    fn gateway_endpoint_comes_from_the_named_peer() {
        let profile = ConnectionProfile::from_toml(PROFILE).unwrap();
        let endpoint = profile.gateway_endpoint(false).unwrap();
        assert_eq!(endpoint, Endpoint { host: "peer0.org1.example.com".to_string(), port: 7051 });
    }

    #[test]
    fn discovery_as_localhost_rewrites_the_host_only() {
        let profile = ConnectionProfile::from_toml(PROFILE).unwrap();
        let endpoint = profile.gateway_endpoint(true).unwrap();
        assert_eq!(endpoint, Endpoint { host: "127.0.0.1".to_string(), port: 7051 });
    }

    #[test]
    fn unknown_gateway_peer_is_a_profile_error() {
        let profile = ConnectionProfile::from_toml(
            r#"
gateway_peer = "peer9"
[peers.peer0]
url = "localhost:7051"
"#,
        )
        .unwrap();
        assert!(matches!(profile.gateway_endpoint(false), Err(GatewayError::Profile(_))));
    }

    #[test]
    fn endpoints_need_host_and_numeric_port() {
        assert!(Endpoint::parse("localhost").is_err());
        assert!(Endpoint::parse(":7051").is_err());
        assert!(Endpoint::parse("grpc://localhost:port").is_err());
        assert_eq!(Endpoint::parse("grpc://localhost:7051/").unwrap().port, 7051);
    }

    #[test]
    fn malformed_profile_is_rejected() {
        assert!(matches!(ConnectionProfile::from_toml("gateway_peer = 3"), Err(GatewayError::Profile(_))));
    }

    #[test]
    fn yaml_profile_is_not_accepted_as_toml() {
        let yaml = "---\nname: test-network-org1\npeers:\n  peer0.org1.example.com:\n    url: grpcs://localhost:7051\n";
        assert!(matches!(ConnectionProfile::from_toml(yaml), Err(GatewayError::Profile(_))));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("connection-org1.toml");
        assert!(matches!(ConnectionProfile::from_file(&missing), Err(GatewayError::Io { .. })));
    }
}
