//! Ignition file contents decoding
//!
//! MachineConfigs embed file contents as data URLs, either percent-encoded
//! plain text or base64.

use crate::error::{Error, Result};
use k8s_openapi::ByteString;

/// Prefix of percent-encoded plain text contents
pub const PLAIN_PAYLOAD_PREFIX: &str = "data:text/plain,";

/// Prefix of base64-encoded contents
pub const BASE64_PAYLOAD_PREFIX: &str = "data:text/plain;charset=utf-8;base64,";

/// Decode the `contents.source` data URL of an Ignition file
pub fn decode_data_url(source: &str) -> Result<Vec<u8>> {
    if let Some(encoded) = source.strip_prefix(BASE64_PAYLOAD_PREFIX) {
        // ByteString (de)serializes as standard base64
        let value = serde_json::Value::String(encoded.to_string());
        let ByteString(bytes) = serde_json::from_value::<ByteString>(value)
            .map_err(|e| Error::UnsupportedPayload(format!("invalid base64 contents: {}", e)))?;
        return Ok(bytes);
    }

    if let Some(encoded) = source.strip_prefix(PLAIN_PAYLOAD_PREFIX) {
        return Ok(urlencoding::decode_binary(encoded.as_bytes()).into_owned());
    }

    let scheme: String = source.chars().take_while(|c| *c != ',').take(64).collect();
    Err(Error::UnsupportedPayload(scheme))
}
