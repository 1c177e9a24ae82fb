use crate::internal_prelude::*;

use super::RlpEncoder;
use crate::signing::Secp256k1Signature;

/// A fully specified pre-EIP-2718 transaction, signed with EIP-155 replay protection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas: U256,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
}

impl LegacyTransaction {
    fn encode_fields(&self) -> RlpEncoder {
        RlpEncoder::new()
            .u64(self.nonce)
            .uint(self.gas_price)
            .uint(self.gas)
            .address(self.to)
            .uint(self.value)
            .bytes(&self.data)
    }

    /// `rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0])`
    pub fn signing_payload(&self, chain_id: u64) -> Vec<u8> {
        self.encode_fields()
            .u64(chain_id)
            .u64(0)
            .u64(0)
            .list()
            .build()
    }

    pub fn signing_hash(&self, chain_id: u64) -> Hash {
        keccak256(self.signing_payload(chain_id))
    }

    /// `rlp([nonce, gasPrice, gas, to, value, data, v, r, s])` with `v = recovery_id + chainId * 2 + 35`
    pub fn encode_signed(&self, signature: &Secp256k1Signature, chain_id: u64) -> Vec<u8> {
        let v = U256::from(signature.recovery_id)
            + U256::from(chain_id) * U256::new(2)
            + U256::new(35);
        self.encode_fields()
            .uint(v)
            .uint(U256::from_be_bytes(signature.r))
            .uint(U256::from_be_bytes(signature.s))
            .list()
            .build()
    }
}
