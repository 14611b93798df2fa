//! Session handles: a [`Gateway`] connection, the [`Network`] of one channel and a [`Contract`] on it.

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info};

use crate::client::Client;
use crate::connection::Connection;
use crate::types::{
    ChannelRequest, ConnectionProfile, Creator, FileSystemWallet, GatewayError, GatewayRequest, Proposal, TransportKey,
};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_KEYSTORE_PATH: &str = "keystore";

/// Options that shape how a gateway session is opened.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Map discovered peer hosts to the loopback address, for networks running on this machine.
    pub discovery_as_localhost: bool,
    pub connect_timeout: Duration,
    /// Directory caching the transport key.
    pub keystore_path: PathBuf,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            discovery_as_localhost: true,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            keystore_path: PathBuf::from(DEFAULT_KEYSTORE_PATH),
        }
    }
}

pub struct Gateway {
    client: Client,
    creator: Creator,
}

pub struct Network {
    client: Client,
    channel: String,
    creator: Creator,
}

#[derive(Clone)]
pub struct Contract {
    client: Client,
    channel: String,
    name: String,
    creator: Creator,
}

impl Gateway {
    /// Connects to the gateway peer named in the profile, acting as the wallet identity `label`.
    pub async fn connect(profile: &ConnectionProfile, wallet: &FileSystemWallet, label: &str, options: GatewayOptions) -> Result<Self, GatewayError> {
        let identity = wallet.get(label)?;
        let transport_key = TransportKey::load_or_generate(&options.keystore_path)?;
        debug!("Using transport peer id {}", transport_key.get_peer_id());

        let endpoint = profile.gateway_endpoint(options.discovery_as_localhost)?;
        let address = Connection::resolve(&endpoint).await?;
        info!("Connecting to gateway peer {} at {}", profile.gateway_peer, address);

        let client = Client::new(&transport_key.keypair, address, options.connect_timeout).await?;

        Ok(Self {
            client,
            creator: identity.creator(),
        })
    }

    /// Resolves a channel, failing when the gateway does not serve it to this identity.
    pub async fn get_network(&self, channel: &str) -> Result<Network, GatewayError> {
        let request = GatewayRequest::DescribeChannel(ChannelRequest {
            channel: channel.to_string(),
            creator: self.creator.clone(),
        });
        self.client
            .process_request(request)
            .await?
            .into_payload()
            .map_err(GatewayError::Rejected)?;

        Ok(Network {
            client: self.client.clone(),
            channel: channel.to_string(),
            creator: self.creator.clone(),
        })
    }

    pub async fn close(self) {
        self.client.close().await;
    }
}

impl Network {
    pub fn name(&self) -> &str {
        &self.channel
    }

    pub fn get_contract(&self, name: &str) -> Contract {
        Contract {
            client: self.client.clone(),
            channel: self.channel.clone(),
            name: name.to_string(),
            creator: self.creator.clone(),
        }
    }
}

impl Contract {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submits a transaction and waits until it is committed to the ledger.
    pub async fn submit_transaction(&self, function: &str, args: &[&str]) -> Result<Bytes, GatewayError> {
        let proposal = Proposal::new(&self.channel, &self.name, function, args, &self.creator);
        debug!("Submitting {} as transaction {}", function, proposal.transaction_id);
        self.send(GatewayRequest::Submit(proposal)).await
    }

    /// Evaluates a transaction against the world state without recording it.
    pub async fn evaluate_transaction(&self, function: &str, args: &[&str]) -> Result<Bytes, GatewayError> {
        let proposal = Proposal::new(&self.channel, &self.name, function, args, &self.creator);
        debug!("Evaluating {} as transaction {}", function, proposal.transaction_id);
        self.send(GatewayRequest::Evaluate(proposal)).await
    }

    async fn send(&self, request: GatewayRequest) -> Result<Bytes, GatewayError> {
        self.client
            .process_request(request)
            .await?
            .into_payload()
            .map_err(GatewayError::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use std::iter;

    use futures::StreamExt;
    use libp2p::core::upgrade::Version;
    use libp2p::identity::Keypair;
    use libp2p::multiaddr::Protocol;
    use libp2p::request_response::{self, json, Message, ProtocolSupport};
    use libp2p::swarm::{self, NetworkBehaviour, SwarmEvent};
    use libp2p::{noise, ping, tcp, yamux, PeerId, StreamProtocol, Swarm, Transport};

    use super::*;
    use crate::behaviour::GATEWAY_PROTOCOL;
    use crate::{GatewayResponse, X509Identity};

    #[derive(NetworkBehaviour)]
    struct Responder {
        request_response: json::Behaviour<GatewayRequest, GatewayResponse>,
        ping: ping::Behaviour,
    }

    fn responder_swarm() -> Swarm<Responder> {
        let keypair = Keypair::generate_ed25519();
        let transport = tcp::tokio::Transport::default()
            .upgrade(Version::V1)
            .authenticate(noise::Config::new(&keypair).unwrap())
            .multiplex(yamux::Config::default())
            .boxed();
        let protocols = iter::once((StreamProtocol::new(GATEWAY_PROTOCOL), ProtocolSupport::Inbound));
        let behaviour = Responder {
            request_response: json::Behaviour::new(protocols, request_response::Config::default()),
            ping: ping::Behaviour::new(ping::Config::new()),
        };
        let swarm_config = swarm::Config::with_tokio_executor().with_idle_connection_timeout(Duration::from_secs(60));
        Swarm::new(transport, behaviour, PeerId::from(keypair.public()), swarm_config)
    }

    /// `None` leaves the caller without an answer. `Hangup` also drops the connection.
    fn answer(request: GatewayRequest) -> Option<GatewayResponse> {
        let (kind, proposal) = match request {
            GatewayRequest::DescribeChannel(request) if request.channel == "mychannel" => {
                return Some(GatewayResponse::Success(Bytes::new()));
            }
            GatewayRequest::DescribeChannel(request) => {
                return Some(GatewayResponse::Failure(format!("channel {} not found", request.channel)));
            }
            GatewayRequest::Submit(proposal) => ("submit", proposal),
            GatewayRequest::Evaluate(proposal) => ("evaluate", proposal),
        };
        match proposal.function.as_str() {
            "Fail" => Some(GatewayResponse::Failure("chaincode error".to_string())),
            "Drop" | "Hangup" => None,
            function => Some(GatewayResponse::Success(Bytes::from(format!(
                "{}:{}.{}({})",
                kind,
                proposal.contract,
                function,
                proposal.args.join(",")
            )))),
        }
    }

    /// Starts a gateway peer on a loopback port and returns the port.
    async fn spawn_responder() -> u16 {
        let mut swarm = responder_swarm();
        swarm.listen_on("/ip4/127.0.0.1/tcp/0".parse().unwrap()).unwrap();

        let port = loop {
            if let SwarmEvent::NewListenAddr { address, .. } = swarm.select_next_some().await {
                if let Some(Protocol::Tcp(port)) = address.iter().find(|protocol| matches!(protocol, Protocol::Tcp(_))) {
                    break port;
                }
            }
        };

        tokio::spawn(async move {
            loop {
                let event = swarm.select_next_some().await;
                let SwarmEvent::Behaviour(ResponderEvent::RequestResponse(request_response::Event::Message {
                    peer,
                    message: Message::Request { request, channel, .. },
                    ..
                })) = event
                else {
                    continue;
                };

                let hangup = matches!(&request, GatewayRequest::Submit(proposal) | GatewayRequest::Evaluate(proposal) if proposal.function == "Hangup");
                match answer(request) {
                    Some(response) => {
                        let _ = swarm.behaviour_mut().request_response.send_response(channel, response);
                    }
                    None => drop(channel),
                }
                if hangup {
                    let _ = swarm.disconnect_peer_id(peer);
                }
            }
        });

        port
    }

    async fn connect_to(port: u16, dir: &std::path::Path) -> Gateway {
        let wallet = FileSystemWallet::new(dir.join("wallet")).unwrap();
        wallet.put("appUser", &X509Identity::new("Org1MSP", "CERT", "KEY")).unwrap();
        let options = GatewayOptions {
            discovery_as_localhost: true,
            connect_timeout: Duration::from_secs(10),
            keystore_path: dir.join("keystore"),
        };
        Gateway::connect(&profile(port), &wallet, "appUser", options).await.unwrap()
    }

    fn profile(port: u16) -> ConnectionProfile {
        ConnectionProfile::from_toml(&format!(
            "gateway_peer = \"peer0\"\n[peers.peer0]\nurl = \"grpc://peer0.example.com:{port}\"\n"
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn connect_needs_the_identity_in_the_wallet() {
        let dir = tempfile::tempdir().unwrap();
        let wallet = FileSystemWallet::new(dir.path().join("wallet")).unwrap();
        let options = GatewayOptions {
            keystore_path: dir.path().join("keystore"),
            ..GatewayOptions::default()
        };

        let result = Gateway::connect(&profile(7051), &wallet, "appUser", options).await;
        assert!(matches!(result, Err(GatewayError::IdentityNotFound(_))));
    }

    #[tokio::test]
    async fn connect_fails_when_nothing_listens() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let dir = tempfile::tempdir().unwrap();
        let wallet = FileSystemWallet::new(dir.path().join("wallet")).unwrap();
        wallet.put("appUser", &X509Identity::new("Org1MSP", "CERT", "KEY")).unwrap();
        let options = GatewayOptions {
            discovery_as_localhost: true,
            connect_timeout: Duration::from_secs(5),
            keystore_path: dir.path().join("keystore"),
        };

        let result = Gateway::connect(&profile(port), &wallet, "appUser", options).await;
        assert!(matches!(result, Err(GatewayError::Dial(_)) | Err(GatewayError::Timeout(_))));
        assert!(dir.path().join("keystore").join("transport.key").exists());
    }

    #[tokio::test]
    async fn gateway_peer_answers_reach_the_caller() {
        let port = spawn_responder().await;
        let dir = tempfile::tempdir().unwrap();
        let gateway = connect_to(port, dir.path()).await;

        let unknown = gateway.get_network("otherchannel").await;
        assert!(matches!(unknown, Err(GatewayError::Rejected(message)) if message.contains("otherchannel")));

        let contract = gateway.get_network("mychannel").await.unwrap().get_contract("basic");
        let committed = contract.submit_transaction("Issue", &["C-1", "Org1", "D1"]).await.unwrap();
        assert_eq!(committed, Bytes::from("submit:basic.Issue(C-1,Org1,D1)"));

        let (first, second) = tokio::join!(
            contract.evaluate_transaction("Query", &["C-1", "Org1"]),
            contract.evaluate_transaction("Query", &["C-2", "Org2"]),
        );
        assert_eq!(first.unwrap(), Bytes::from("evaluate:basic.Query(C-1,Org1)"));
        assert_eq!(second.unwrap(), Bytes::from("evaluate:basic.Query(C-2,Org2)"));

        let failed = contract.submit_transaction("Fail", &[]).await;
        assert!(matches!(failed, Err(GatewayError::Rejected(message)) if message == "chaincode error"));

        gateway.close().await;
    }

    #[tokio::test]
    async fn unanswered_request_fails_alone() {
        let port = spawn_responder().await;
        let dir = tempfile::tempdir().unwrap();
        let gateway = connect_to(port, dir.path()).await;
        let contract = gateway.get_network("mychannel").await.unwrap().get_contract("basic");

        let dropped = contract.evaluate_transaction("Drop", &[]).await;
        assert!(matches!(dropped, Err(GatewayError::Request(_))));

        let answered = contract.evaluate_transaction("Query", &["C-1"]).await.unwrap();
        assert_eq!(answered, Bytes::from("evaluate:basic.Query(C-1)"));

        gateway.close().await;
    }

    #[tokio::test]
    async fn request_after_a_dropped_connection_waits_for_the_redial() {
        let port = spawn_responder().await;
        let dir = tempfile::tempdir().unwrap();
        let gateway = connect_to(port, dir.path()).await;
        let contract = gateway.get_network("mychannel").await.unwrap().get_contract("basic");

        assert!(contract.submit_transaction("Hangup", &[]).await.is_err());
        tokio::time::sleep(Duration::from_millis(500)).await;

        let answered = contract.submit_transaction("Issue", &["C-9", "Org1", "D9"]).await.unwrap();
        assert_eq!(answered, Bytes::from("submit:basic.Issue(C-9,Org1,D9)"));

        gateway.close().await;
    }
}
