use crate::internal_prelude::*;
use std::fmt;

/// JSON-RPC error code nodes use for a call or transaction that executed and reverted.
pub const EXECUTION_REVERTED_CODE: i64 = 3;

/// A mined transaction as reported by `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: Hash,
    pub block_number: u64,
    /// `true` if execution succeeded, `false` if it reverted.
    pub status: bool,
    pub gas_used: U256,
}

/// Represents an error returned by a [`Provider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The node could not be reached or the request did not complete.
    Transport(String),
    /// The node answered with a JSON-RPC error object.
    Rpc {
        code: i64,
        message: String,
        data: Option<String>,
    },
    /// The node answered with something that is not a valid result for the method.
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether the node rejected the call because contract execution reverted.
    pub fn is_revert(&self) -> bool {
        match self {
            ProviderError::Rpc { code, message, .. } => {
                *code == EXECUTION_REVERTED_CODE || message.contains("revert")
            }
            _ => false,
        }
    }
}

impl std::error::Error for ProviderError {}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The subset of the node API needed to read contract state and submit transactions.
///
/// Every method blocks until the node has answered.
pub trait Provider {
    /// `eth_chainId`
    fn chain_id(&mut self) -> Result<u64, ProviderError>;

    /// `eth_accounts`: the accounts the node can sign for.
    fn accounts(&mut self) -> Result<Vec<Address>, ProviderError>;

    /// `eth_blockNumber`
    fn block_number(&mut self) -> Result<u64, ProviderError>;

    /// `eth_call` against the latest block.
    fn call(&mut self, from: Address, to: Address, data: &[u8]) -> Result<Vec<u8>, ProviderError>;

    /// `eth_sendTransaction`: the node fills in nonce and gas and signs with `request.from`.
    fn send_transaction(&mut self, request: &TransactionRequest) -> Result<Hash, ProviderError>;

    /// `eth_sendRawTransaction`
    fn send_raw_transaction(&mut self, raw: &[u8]) -> Result<Hash, ProviderError>;

    /// `eth_getTransactionCount` against the pending block.
    fn transaction_count(&mut self, address: Address) -> Result<u64, ProviderError>;

    /// `eth_gasPrice`
    fn gas_price(&mut self) -> Result<U256, ProviderError>;

    /// `eth_estimateGas`
    fn estimate_gas(&mut self, request: &TransactionRequest) -> Result<U256, ProviderError>;

    /// `eth_getTransactionReceipt`: `None` while the transaction is pending.
    fn transaction_receipt(
        &mut self,
        hash: Hash,
    ) -> Result<Option<TransactionReceipt>, ProviderError>;
}

impl<P: Provider + ?Sized> Provider for &mut P {
    fn chain_id(&mut self) -> Result<u64, ProviderError> {
        (**self).chain_id()
    }

    fn accounts(&mut self) -> Result<Vec<Address>, ProviderError> {
        (**self).accounts()
    }

    fn block_number(&mut self) -> Result<u64, ProviderError> {
        (**self).block_number()
    }

    fn call(&mut self, from: Address, to: Address, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        (**self).call(from, to, data)
    }

    fn send_transaction(&mut self, request: &TransactionRequest) -> Result<Hash, ProviderError> {
        (**self).send_transaction(request)
    }

    fn send_raw_transaction(&mut self, raw: &[u8]) -> Result<Hash, ProviderError> {
        (**self).send_raw_transaction(raw)
    }

    fn transaction_count(&mut self, address: Address) -> Result<u64, ProviderError> {
        (**self).transaction_count(address)
    }

    fn gas_price(&mut self) -> Result<U256, ProviderError> {
        (**self).gas_price()
    }

    fn estimate_gas(&mut self, request: &TransactionRequest) -> Result<U256, ProviderError> {
        (**self).estimate_gas(request)
    }

    fn transaction_receipt(
        &mut self,
        hash: Hash,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        (**self).transaction_receipt(hash)
    }
}
