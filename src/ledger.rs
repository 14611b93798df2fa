use async_trait::async_trait;
use bytes::Bytes;
use ledger_gateway_sdk_rs::{Contract, GatewayError};

/// The two ledger calls the command loop makes.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// State-changing call, committed to the ledger.
    async fn submit(&self, function: &str, args: &[&str]) -> Result<Bytes, GatewayError>;

    /// Read-only call against the world state.
    async fn evaluate(&self, function: &str, args: &[&str]) -> Result<Bytes, GatewayError>;
}

#[async_trait]
impl CreditLedger for Contract {
    async fn submit(&self, function: &str, args: &[&str]) -> Result<Bytes, GatewayError> {
        self.submit_transaction(function, args).await
    }

    async fn evaluate(&self, function: &str, args: &[&str]) -> Result<Bytes, GatewayError> {
        self.evaluate_transaction(function, args).await
    }
}
