//! JSON-RPC implementation of [`ChainClient`].
//!
//! Talks to an Ethereum-compatible node over HTTP. Writes go through
//! `eth_sendTransaction`, so the node signs with one of its own unlocked accounts; the
//! returned hash is then polled with `eth_getTransactionReceipt` until the transaction is
//! mined. The gateway bounds the whole exchange with its own timeout, so polling here has
//! no deadline of its own.

use crate::abi::encode_call;
use async_trait::async_trait;
use medchain_core::{
    ChainClient, ChainError, ChainResult, GatewayConfig, Receipt, RemoteCall,
};
use medchain_types::Address;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: String,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

fn parse_quantity(value: &str) -> Option<u64> {
    let digits = value.strip_prefix("0x")?;
    u64::from_str_radix(digits, 16).ok()
}

#[derive(Debug)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    poll_interval: Duration,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            poll_interval,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(cfg: &GatewayConfig) -> Self {
        Self::new(cfg.rpc_url(), cfg.poll_interval())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> ChainResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::debug!(id, method, "json-rpc request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Transport(format!(
                "{method}: node answered HTTP {status}"
            )));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::InvalidResponse(format!("{method}: {e}")))?;

        if let Some(err) = envelope.error {
            tracing::debug!(id, method, code = err.code, "json-rpc error: {}", err.message);
            return Err(ChainError::Rejected(err.message));
        }

        serde_json::from_value(envelope.result.unwrap_or(Value::Null))
            .map_err(|e| ChainError::InvalidResponse(format!("{method}: {e}")))
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> ChainResult<Receipt> {
        loop {
            let receipt: Option<RpcReceipt> = self
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            if let Some(receipt) = receipt {
                if receipt.status.as_deref() == Some("0x0") {
                    return Err(ChainError::Reverted {
                        tx_hash: receipt.transaction_hash,
                    });
                }
                return Ok(Receipt {
                    block_number: receipt.block_number.as_deref().and_then(parse_quantity),
                    transaction_hash: receipt.transaction_hash,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl ChainClient for JsonRpcClient {
    async fn accounts(&self) -> ChainResult<Vec<Address>> {
        self.request("eth_accounts", json!([])).await
    }

    async fn send_transaction(&self, call: &RemoteCall) -> ChainResult<Receipt> {
        let data = encode_call(call.operation, &call.args)
            .map_err(|e| ChainError::Rejected(format!("cannot encode call: {e}")))?;

        let tx = json!([{
            "from": call.from.to_string(),
            "to": call.contract.to_string(),
            "data": format!("0x{}", hex::encode(data)),
        }]);
        let tx_hash: String = self.request("eth_sendTransaction", tx).await?;
        tracing::debug!(operation = %call.operation, tx = %tx_hash, "transaction submitted");

        self.wait_for_receipt(&tx_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_quantities() {
        assert_eq!(parse_quantity("0x1b4"), Some(436));
        assert_eq!(parse_quantity("0x0"), Some(0));
        assert_eq!(parse_quantity("1b4"), None);
        assert_eq!(parse_quantity("0xzz"), None);
    }

    #[test]
    fn error_envelope_deserialises() {
        let envelope: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "revert patient not found" }
        }))
        .expect("deserialize");
        assert!(envelope.result.is_none());
        let err = envelope.error.expect("error object");
        assert_eq!(err.code, -32000);
        assert_eq!(err.message, "revert patient not found");
    }

    #[test]
    fn receipt_deserialises_from_camel_case() {
        let receipt: RpcReceipt = serde_json::from_value(json!({
            "transactionHash": "0xabc",
            "blockNumber": "0x10",
            "status": "0x1",
            "gasUsed": "0x5208"
        }))
        .expect("deserialize");
        assert_eq!(receipt.transaction_hash, "0xabc");
        assert_eq!(receipt.block_number.as_deref().and_then(parse_quantity), Some(16));
        assert_eq!(receipt.status.as_deref(), Some("0x1"));
    }
}
