use crate::internal_prelude::*;

pub trait Signer {
    fn address(&self) -> Address;

    /// Signs the transaction and returns its raw encoding together with its hash.
    fn sign_transaction(&self, transaction: &LegacyTransaction, chain_id: u64) -> (Vec<u8>, Hash);
}

impl Signer for PrivateKey {
    fn address(&self) -> Address {
        PrivateKey::address(self)
    }

    fn sign_transaction(&self, transaction: &LegacyTransaction, chain_id: u64) -> (Vec<u8>, Hash) {
        let signature = self.sign(&transaction.signing_hash(chain_id));
        let raw = transaction.encode_signed(&signature, chain_id);
        let hash = keccak256(&raw);
        (raw, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_eip155_example_transaction() {
        let key = PrivateKey::from_hex(
            "4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap();
        let transaction = LegacyTransaction {
            nonce: 9,
            gas_price: U256::new(20_000_000_000),
            gas: U256::new(21000),
            to: Address([0x35; 20]),
            value: U256::new(1_000_000_000_000_000_000),
            data: vec![],
        };

        let (raw, hash) = key.sign_transaction(&transaction, 1);

        assert_eq!(
            hex::encode(&raw),
            concat!(
                "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a7640000",
                "8025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276",
                "a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
            )
        );
        assert_eq!(hash, keccak256(&raw));
        assert_eq!(
            Signer::address(&key).to_string(),
            "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F"
        );
    }
}
