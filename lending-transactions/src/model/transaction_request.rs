use crate::internal_prelude::*;
use std::fmt;

use super::LegacyTransaction;

/// A contract call to be submitted as a transaction.
///
/// Nonce, gas and gas price are left unset when the node fills them in (node-managed accounts)
/// and must be set before a request can be turned into a locally signed [`LegacyTransaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub nonce: Option<u64>,
    pub gas: Option<U256>,
    pub gas_price: Option<U256>,
}

impl TransactionRequest {
    pub fn new(from: Address, to: Address, data: Vec<u8>) -> Self {
        Self {
            from,
            to,
            value: U256::ZERO,
            data,
            nonce: None,
            gas: None,
            gas_price: None,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn to_legacy(&self) -> Result<LegacyTransaction, MissingFieldError> {
        Ok(LegacyTransaction {
            nonce: self.nonce.ok_or(MissingFieldError("nonce"))?,
            gas_price: self.gas_price.ok_or(MissingFieldError("gasPrice"))?,
            gas: self.gas.ok_or(MissingFieldError("gas"))?,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
        })
    }
}

/// A transaction request was missing a field required for local signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFieldError(pub &'static str);

impl std::error::Error for MissingFieldError {}

impl fmt::Display for MissingFieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
