use std::iter;
use std::time::Duration;
use libp2p::{ping, request_response, StreamProtocol};
use libp2p::request_response::{json, ProtocolSupport};
use libp2p::swarm::NetworkBehaviour;

use crate::{GatewayRequest, GatewayResponse};

pub(crate) const GATEWAY_PROTOCOL: &str = "/ledger-gateway/1";

type RequestResponseEvent = request_response::Event<GatewayRequest, GatewayResponse>;

#[derive(NetworkBehaviour)]
#[behaviour(to_swarm = "Event")]
pub struct GatewayBehaviour {
    pub request_response: json::Behaviour<GatewayRequest, GatewayResponse>,
    pub ping: ping::Behaviour
}

impl GatewayBehaviour {
    pub fn new(request_timeout: Duration) -> Self {
        let protocols = iter::once((StreamProtocol::new(GATEWAY_PROTOCOL), ProtocolSupport::Outbound));
        let request_response_behaviour = json::Behaviour::<GatewayRequest, GatewayResponse>::new(protocols, request_response::Config::default().with_request_timeout(request_timeout));

        let ping_behaviour = ping::Behaviour::new(Default::default());

        Self {
            request_response: request_response_behaviour,
            ping: ping_behaviour
        }
    }
}

#[derive(Debug)]
pub enum Event {
    RequestResponse(RequestResponseEvent),
    Ping(ping::Event),
}


impl From<RequestResponseEvent> for Event {
    fn from(event: RequestResponseEvent) -> Self {
        Event::RequestResponse(event)
    }
}

impl From<ping::Event> for Event {
    fn from(event: ping::Event) -> Self {
        Event::Ping(event)
    }
}
