//! A blocking JSON-RPC client for an Ethereum node, implementing [`Provider`] over HTTP.

mod quantity;

pub use quantity::*;

use lending_transactions::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Per-request timeout applied by the HTTP transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct JsonRpcProvider {
    url: String,
    agent: ureq::Agent,
    next_id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: Hash,
    block_number: Option<String>,
    status: Option<String>,
    gas_used: String,
}

impl JsonRpcProvider {
    pub fn new(url: &str) -> Self {
        Self::with_timeout(url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_owned(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            next_id: 0,
        }
    }

    fn request<T: DeserializeOwned>(
        &mut self,
        method: &str,
        params: Value,
    ) -> Result<T, ProviderError> {
        self.next_id += 1;
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": method,
            "params": params,
        });

        let response = match self.agent.post(&self.url).send_json(body) {
            Ok(response) => response,
            // Some nodes pair JSON-RPC error objects with a non-200 status.
            Err(ureq::Error::Status(_, response)) => response,
            Err(error) => return Err(ProviderError::Transport(error.to_string())),
        };
        let response: JsonRpcResponse = response
            .into_json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(ProviderError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data.map(|d| match d {
                    Value::String(s) => s,
                    other => other.to_string(),
                }),
            });
        }
        let result = response.result.unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(|e| {
            ProviderError::InvalidResponse(format!("{} returned unexpected result: {}", method, e))
        })
    }
}

fn transaction_request_json(request: &TransactionRequest) -> Value {
    let mut object = json!({
        "from": request.from,
        "to": request.to,
        "value": format_quantity(request.value),
        "data": format_bytes(&request.data),
    });
    if let Some(nonce) = request.nonce {
        object["nonce"] = json!(format_quantity(U256::from(nonce)));
    }
    if let Some(gas) = request.gas {
        object["gas"] = json!(format_quantity(gas));
    }
    if let Some(gas_price) = request.gas_price {
        object["gasPrice"] = json!(format_quantity(gas_price));
    }
    object
}

fn convert_receipt(receipt: RpcReceipt) -> Result<Option<TransactionReceipt>, ProviderError> {
    // Some nodes return pending transactions with a null block number.
    let block_number = match receipt.block_number {
        Some(block_number) => parse_quantity_u64(&block_number)?,
        None => return Ok(None),
    };
    let status = match receipt.status {
        Some(status) => parse_quantity(&status)? == U256::ONE,
        None => true,
    };
    Ok(Some(TransactionReceipt {
        transaction_hash: receipt.transaction_hash,
        block_number,
        status,
        gas_used: parse_quantity(&receipt.gas_used)?,
    }))
}

impl Provider for JsonRpcProvider {
    fn chain_id(&mut self) -> Result<u64, ProviderError> {
        let chain_id: String = self.request("eth_chainId", json!([]))?;
        parse_quantity_u64(&chain_id)
    }

    fn accounts(&mut self) -> Result<Vec<Address>, ProviderError> {
        self.request("eth_accounts", json!([]))
    }

    fn block_number(&mut self) -> Result<u64, ProviderError> {
        let block_number: String = self.request("eth_blockNumber", json!([]))?;
        parse_quantity_u64(&block_number)
    }

    fn call(&mut self, from: Address, to: Address, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        let output: String = self.request(
            "eth_call",
            json!([{ "from": from, "to": to, "data": format_bytes(data) }, "latest"]),
        )?;
        parse_bytes(&output)
    }

    fn send_transaction(&mut self, request: &TransactionRequest) -> Result<Hash, ProviderError> {
        self.request(
            "eth_sendTransaction",
            json!([transaction_request_json(request)]),
        )
    }

    fn send_raw_transaction(&mut self, raw: &[u8]) -> Result<Hash, ProviderError> {
        self.request("eth_sendRawTransaction", json!([format_bytes(raw)]))
    }

    fn transaction_count(&mut self, address: Address) -> Result<u64, ProviderError> {
        let count: String =
            self.request("eth_getTransactionCount", json!([address, "pending"]))?;
        parse_quantity_u64(&count)
    }

    fn gas_price(&mut self) -> Result<U256, ProviderError> {
        let gas_price: String = self.request("eth_gasPrice", json!([]))?;
        parse_quantity(&gas_price)
    }

    fn estimate_gas(&mut self, request: &TransactionRequest) -> Result<U256, ProviderError> {
        let gas: String = self.request(
            "eth_estimateGas",
            json!([transaction_request_json(request)]),
        )?;
        parse_quantity(&gas)
    }

    fn transaction_receipt(
        &mut self,
        hash: Hash,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        let receipt: Option<RpcReceipt> =
            self.request("eth_getTransactionReceipt", json!([hash]))?;
        match receipt {
            Some(receipt) => convert_receipt(receipt),
            None => Ok(None),
        }
    }
}
