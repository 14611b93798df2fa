use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::identity::Creator;
use crate::transaction_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayRequest {
	DescribeChannel(ChannelRequest),
	Submit(Proposal),
	Evaluate(Proposal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayResponse {
	Success(Bytes),
	Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRequest {
	pub channel: String,
	pub creator: Creator,
}

/// A contract function invocation, addressed to one contract on one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
	pub transaction_id: String,
	pub channel: String,
	pub contract: String,
	pub function: String,
	pub args: Vec<String>,
	pub creator: Creator,
}

impl Proposal {
	pub fn new(channel: &str, contract: &str, function: &str, args: &[&str], creator: &Creator) -> Self {
		let nonce = Uuid::new_v4();
		Self {
			transaction_id: transaction_id(nonce.as_bytes(), creator),
			channel: channel.to_string(),
			contract: contract.to_string(),
			function: function.to_string(),
			args: args.iter().map(|arg| arg.to_string()).collect(),
			creator: creator.clone(),
		}
	}
}

impl GatewayResponse {
	pub fn into_payload(self) -> Result<Bytes, String> {
		match self {
			GatewayResponse::Success(payload) => Ok(payload),
			GatewayResponse::Failure(message) => Err(message),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn creator() -> Creator {
		Creator { msp_id: "Org1MSP".to_string(), certificate: "CERT".to_string() }
	}

	#[test]
	fn proposal_keeps_argument_order() {
		let proposal = Proposal::new("mychannel", "basic", "Issue", &["Credit-1", "Org1", "1700000000000"], &creator());
		assert_eq!(proposal.args, vec!["Credit-1", "Org1", "1700000000000"]);
		assert_eq!(proposal.function, "Issue");
		assert_eq!(proposal.transaction_id.len(), 64);
	}

	#[test]
	fn every_proposal_gets_a_fresh_transaction_id() {
		let first = Proposal::new("mychannel", "basic", "Instantiate", &[], &creator());
		let second = Proposal::new("mychannel", "basic", "Instantiate", &[], &creator());
		assert_ne!(first.transaction_id, second.transaction_id);
	}

	#[test]
	fn request_survives_the_json_codec() {
		let request = GatewayRequest::Evaluate(Proposal::new("mychannel", "basic", "Query", &["C-1", "Org1"], &creator()));
		let encoded = serde_json::to_vec(&request).unwrap();
		let decoded: GatewayRequest = serde_json::from_slice(&encoded).unwrap();
		assert_eq!(decoded, request);
	}

	#[test]
	fn failure_response_carries_its_message() {
		let response = GatewayResponse::Failure("credit exists".to_string());
		assert_eq!(response.into_payload(), Err("credit exists".to_string()));
		let response = GatewayResponse::Success(Bytes::from_static(b"{}"));
		assert_eq!(response.into_payload().unwrap(), Bytes::from_static(b"{}"));
	}
}
