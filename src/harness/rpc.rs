//! JSON-RPC verifier client
//!
//! Calls `verifyProof` on a deployed verifier contract with `eth_call`.
//! The call is read-only; nothing is signed or broadcast.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use super::services::{ServiceError, VerifierService};
use crate::calldata::{decode_bool, encode_call};
use crate::types::VerifierArguments;

/// `eth_call` verifier bound to one contract
#[derive(Debug)]
pub struct EthCallVerifier {
    client: Client,
    rpc_url: String,
    contract: String,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (CallObject<'a>, &'static str),
}

#[derive(Debug, Serialize)]
struct CallObject<'a> {
    to: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl EthCallVerifier {
    /// `contract` must be a `0x`-prefixed 20-byte address
    pub fn new(rpc_url: &str, contract: &str) -> Result<Self, ServiceError> {
        let digits = contract.strip_prefix("0x").unwrap_or_default();
        if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ServiceError::InvalidResponse(format!(
                "not a contract address: {}",
                contract
            )));
        }

        Ok(Self {
            client: Client::new(),
            rpc_url: rpc_url.trim_end_matches('/').to_string(),
            contract: contract.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    fn request(&self, data: &[u8]) -> RpcRequest<'_> {
        RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: "eth_call",
            params: (
                CallObject {
                    to: &self.contract,
                    data: format!("0x{}", hex::encode(data)),
                },
                "latest",
            ),
        }
    }

    /// Execute `eth_call` and return the raw return data
    pub async fn call(&self, data: &[u8]) -> Result<Vec<u8>, ServiceError> {
        let resp = self
            .client
            .post(&self.rpc_url)
            .json(&self.request(data))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::InvalidResponse(format!("HTTP {}: {}", status, body)));
        }

        parse_response(resp.json().await?)
    }
}

fn parse_response(response: RpcResponse) -> Result<Vec<u8>, ServiceError> {
    if let Some(error) = response.error {
        return Err(ServiceError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    let result = response
        .result
        .ok_or_else(|| ServiceError::InvalidResponse("missing result".to_string()))?;

    hex::decode(result.trim_start_matches("0x"))
        .map_err(|e| ServiceError::InvalidResponse(format!("result is not hex: {}", e)))
}

#[async_trait]
impl VerifierService for EthCallVerifier {
    async fn verify_proof(&self, arguments: &VerifierArguments) -> Result<bool, ServiceError> {
        let data = encode_call(arguments)?;
        let returned = self.call(&data).await?;

        decode_bool(&returned).ok_or_else(|| {
            ServiceError::InvalidResponse(format!(
                "expected an ABI bool from {}, got 0x{}",
                self.contract,
                hex::encode(&returned)
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERIFIER: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn test_address_validation() {
        assert!(EthCallVerifier::new("http://127.0.0.1:8545", VERIFIER).is_ok());
        assert!(EthCallVerifier::new("http://127.0.0.1:8545", "0x1234").is_err());
        assert!(EthCallVerifier::new("http://127.0.0.1:8545", &VERIFIER[2..]).is_err());
    }

    #[test]
    fn test_request_body() {
        let verifier = EthCallVerifier::new("http://127.0.0.1:8545/", VERIFIER).unwrap();
        assert_eq!(verifier.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(verifier.contract, VERIFIER);

        let body = serde_json::to_value(verifier.request(&[0xde, 0xad])).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_call",
                "params": [{"to": VERIFIER, "data": "0xdead"}, "latest"]
            })
        );

        // Request IDs advance per call
        let body = serde_json::to_value(verifier.request(&[])).unwrap();
        assert_eq!(body["id"], 2);
    }

    #[test]
    fn test_parse_response() {
        let ok: RpcResponse = serde_json::from_value(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": format!("0x{}01", "00".repeat(31))
        }))
        .unwrap();
        let data = parse_response(ok).unwrap();
        assert_eq!(decode_bool(&data), Some(true));

        let reverted: RpcResponse = serde_json::from_value(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 3, "message": "execution reverted"}
        }))
        .unwrap();
        assert!(matches!(
            parse_response(reverted),
            Err(ServiceError::Rpc { code: 3, .. })
        ));

        // No code at the address: empty return data
        let empty: RpcResponse =
            serde_json::from_value(serde_json::json!({"id": 1, "result": "0x"})).unwrap();
        assert_eq!(decode_bool(&parse_response(empty).unwrap()), None);
    }
}
