use crate::types::ClientError;

/// Re-indents a JSON payload for display.
pub fn format_json(payload: &[u8]) -> Result<String, ClientError> {
    let value: serde_json::Value = serde_json::from_slice(payload).map_err(ClientError::MalformedPayload)?;
    serde_json::to_string_pretty(&value).map_err(ClientError::MalformedPayload)
}
