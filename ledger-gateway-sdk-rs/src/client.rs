use std::collections::HashMap;
use std::time::Duration;

use futures::StreamExt;
use libp2p::identity::Keypair;
use libp2p::ping;
use libp2p::request_response::{self, Message, OutboundRequestId};
use libp2p::swarm::SwarmEvent;
use libp2p::{Multiaddr, PeerId, Swarm};
use tokio::select;
use tokio::sync::mpsc::{channel, Receiver, Sender};
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::behaviour::{self, GatewayBehaviour};
use crate::connection::Connection;
use crate::types::error::GatewayError;
use crate::{GatewayRequest, GatewayResponse};

type Reply = oneshot::Sender<Result<GatewayResponse, GatewayError>>;

enum SessionCommand {
    Request(GatewayRequest, Reply),
    Close,
}

/// Handle to the background task that owns the connection to the gateway peer.
#[derive(Clone)]
pub struct Client {
    session_command_sender: Sender<SessionCommand>,
}


impl Client {
    /// Dials the gateway peer and waits until the connection is established.
    pub async fn new(keypair: &Keypair, address: Multiaddr, connect_timeout: Duration) -> Result<Self, GatewayError> {
        let (tx, rx) = channel(400);
        let (ready_sender, ready_receiver) = oneshot::channel();

        let swarm = Connection::connect_swarm(keypair, address.clone(), connect_timeout)?;
        let session = Session::new(swarm, address, ready_sender);
        tokio::spawn(async move { session.run(rx).await });

        let client = Self {
            session_command_sender: tx
        };

        match timeout(connect_timeout, ready_receiver).await {
            Ok(Ok(Ok(peer_id))) => {
                info!("Connected to gateway peer {}", peer_id);
                Ok(client)
            }
            Ok(Ok(Err(error))) => Err(error),
            Ok(Err(_)) => Err(GatewayError::Disconnected),
            Err(_) => {
                client.close().await;
                Err(GatewayError::Timeout(connect_timeout))
            }
        }
    }

    pub async fn process_request(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.session_command_sender
            .send(SessionCommand::Request(request, reply_sender))
            .await
            .map_err(|_| GatewayError::Disconnected)?;

        reply_receiver.await.map_err(|_| GatewayError::Disconnected)?
    }

    pub async fn close(&self) {
        if self.session_command_sender.send(SessionCommand::Close).await.is_err() {
            debug!("Gateway session already closed");
        }
    }
}

struct Session {
    swarm: Swarm<GatewayBehaviour>,
    address: Multiaddr,
    connected_peer_id: Option<PeerId>,
    dialing: bool,
    ready: Option<oneshot::Sender<Result<PeerId, GatewayError>>>,
    queued: Vec<(GatewayRequest, Reply)>,
    in_flight: HashMap<OutboundRequestId, Reply>,
}

impl Session {
    fn new(swarm: Swarm<GatewayBehaviour>, address: Multiaddr, ready: oneshot::Sender<Result<PeerId, GatewayError>>) -> Self {
        Self {
            swarm,
            address,
            connected_peer_id: None,
            dialing: true,
            ready: Some(ready),
            queued: Vec::new(),
            in_flight: HashMap::new(),
        }
    }

    async fn run(mut self, mut session_command_receiver: Receiver<SessionCommand>) {
        loop {
            select! {
                command = session_command_receiver.recv() => {
                    match command {
                        Some(SessionCommand::Request(request, reply)) => self.send_or_queue(request, reply),
                        Some(SessionCommand::Close) | None => break,
                    }
                },

                swarm_event = self.swarm.select_next_some() => self.handle_swarm_event(swarm_event),
            }
        }
        debug!("Gateway session loop stopped");
    }

    fn send_or_queue(&mut self, request: GatewayRequest, reply: Reply) {
        match self.connected_peer_id {
            Some(peer_id) => {
                let request_id = self.swarm.behaviour_mut().request_response.send_request(&peer_id, request);
                self.in_flight.insert(request_id, reply);
            }
            None => {
                self.queued.push((request, reply));
                self.redial();
            }
        }
    }

    fn redial(&mut self) {
        if self.dialing {
            return;
        }
        match self.swarm.dial(self.address.clone()) {
            Ok(()) => {
                debug!("Redialing gateway peer at {}", self.address);
                self.dialing = true;
            }
            Err(error) => self.fail_queued(error.to_string()),
        }
    }

    fn fail_queued(&mut self, message: String) {
        for (_, reply) in self.queued.drain(..) {
            let _ = reply.send(Err(GatewayError::Dial(message.clone())));
        }
    }

    fn handle_swarm_event(&mut self, swarm_event: SwarmEvent<behaviour::Event>) {
        match swarm_event {
            SwarmEvent::ConnectionEstablished { peer_id, .. } => {
                self.connected_peer_id = Some(peer_id);
                self.dialing = false;
                if let Some(ready) = self.ready.take() {
                    let _ = ready.send(Ok(peer_id));
                }
                let queued: Vec<_> = self.queued.drain(..).collect();
                for (request, reply) in queued {
                    self.send_or_queue(request, reply);
                }
            }
            SwarmEvent::OutgoingConnectionError { error, .. } => {
                self.dialing = false;
                let message = format!("{}: {}", self.address, error);
                warn!("Could not reach the gateway peer: {}", message);
                if let Some(ready) = self.ready.take() {
                    let _ = ready.send(Err(GatewayError::Dial(message.clone())));
                }
                self.fail_queued(message);
            }
            SwarmEvent::ConnectionClosed { peer_id, num_established, .. } => {
                if num_established == 0 && self.connected_peer_id == Some(peer_id) {
                    warn!("Connection to gateway peer {} closed", peer_id);
                    self.connected_peer_id = None;
                }
            }
            SwarmEvent::Behaviour(behaviour::Event::RequestResponse(request_response::Event::Message { message: Message::Response { request_id, response }, .. })) => {
                match self.in_flight.remove(&request_id) {
                    Some(reply) => {
                        let _ = reply.send(Ok(response));
                    }
                    None => {
                        warn!("Could not find a waiting caller for response {:?}", request_id);
                    }
                }
            }
            SwarmEvent::Behaviour(behaviour::Event::RequestResponse(request_response::Event::OutboundFailure { request_id, error, .. })) => {
                if let Some(reply) = self.in_flight.remove(&request_id) {
                    let _ = reply.send(Err(GatewayError::Request(error.to_string())));
                }
            }
            SwarmEvent::Behaviour(behaviour::Event::Ping(ping::Event { peer, result: Err(failure), .. })) => {
                debug!("Ping to gateway peer {} failed: {}", peer, failure);
            }
            _ => {}
        }
    }
}
