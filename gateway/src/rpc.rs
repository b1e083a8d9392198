//! JSON-RPC 2.0 client for an Ethereum-compatible node.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::{json, Value};
use tappay_types::{Address, TxHash};

use crate::GatewayError;

/// HTTP client for a node's JSON-RPC endpoint.
///
/// Wraps `reqwest::Client` with the endpoint URL and provides typed methods
/// for the calls the gateway needs.
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client targeting `url` (e.g. `https://forno.celo.org`).
    pub fn new(url: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Rpc(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a JSON-RPC request and return the `result` field.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, id, "rpc call");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Rpc(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(GatewayError::Rpc(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Rpc(format!("invalid JSON response: {e}")))?;
        extract_result(json)
    }

    /// `eth_getTransactionCount(address, "pending")`.
    pub async fn pending_nonce(&self, address: &Address) -> Result<u64, GatewayError> {
        let result = self
            .call("eth_getTransactionCount", json!([address.as_str(), "pending"]))
            .await?;
        let quantity = parse_quantity(&result)?;
        u64::try_from(quantity).map_err(|_| GatewayError::Rpc("nonce out of range".into()))
    }

    /// `eth_sendRawTransaction`; returns the node's transaction hash.
    pub async fn send_raw_transaction(&self, raw_hex: &str) -> Result<TxHash, GatewayError> {
        let result = self.call("eth_sendRawTransaction", json!([raw_hex])).await?;
        let hash = result
            .as_str()
            .ok_or_else(|| GatewayError::Rpc("transaction hash is not a string".into()))?;
        TxHash::from_hex(hash).map_err(|e| GatewayError::Rpc(e.to_string()))
    }

    /// `eth_call` against the latest block; returns the raw return data.
    pub async fn eth_call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, GatewayError> {
        let result = self
            .call(
                "eth_call",
                json!([{ "to": to.as_str(), "data": format!("0x{}", hex::encode(data)) }, "latest"]),
            )
            .await?;
        let text = result
            .as_str()
            .ok_or_else(|| GatewayError::Rpc("call result is not a string".into()))?;
        decode_hex_data(text)
    }
}

/// Pull `result` out of a response envelope, surfacing `error` objects.
pub(crate) fn extract_result(mut envelope: Value) -> Result<Value, GatewayError> {
    if let Some(error) = envelope.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(GatewayError::Rpc(format!("node error: {message}")));
    }
    match envelope.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(GatewayError::Rpc("response has neither result nor error".into())),
    }
}

/// Parse a hex quantity such as `"0x1a"`.
pub(crate) fn parse_quantity(value: &Value) -> Result<u128, GatewayError> {
    let text = value
        .as_str()
        .ok_or_else(|| GatewayError::Rpc(format!("expected hex quantity, got {value}")))?;
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| GatewayError::Rpc(format!("quantity {text:?} lacks 0x prefix")))?;
    if digits.is_empty() {
        return Err(GatewayError::Rpc("empty quantity".into()));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| GatewayError::Rpc(format!("invalid quantity {text:?}: {e}")))
}

fn decode_hex_data(text: &str) -> Result<Vec<u8>, GatewayError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|e| GatewayError::Rpc(format!("invalid hex data: {e}")))
}
