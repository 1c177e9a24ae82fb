use super::Secp256k1Signature;
use crate::internal_prelude::*;
use ::secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use std::fmt;
use zeroize::{DefaultIsZeroes, Zeroize, ZeroizeOnDrop};

lazy_static::lazy_static! {
    pub(crate) static ref SECP256K1_CTX: Secp256k1<All> = secp256k1::Secp256k1::new();
}

#[derive(Copy, Clone)]
pub struct SecretKeyWrapper(SecretKey);
impl Default for SecretKeyWrapper {
    fn default() -> Self {
        let mut data = [0u8; secp256k1::constants::SECRET_KEY_SIZE];
        data[secp256k1::constants::SECRET_KEY_SIZE - 1] = 1;
        Self(SecretKey::from_slice(&data).expect("One is a valid secret key"))
    }
}
impl DefaultIsZeroes for SecretKeyWrapper {}

/// An account's secp256k1 signing key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(SecretKeyWrapper);

impl PrivateKey {
    pub const LENGTH: usize = secp256k1::constants::SECRET_KEY_SIZE;

    /// The account address: the lower 20 bytes of the Keccak hash of the uncompressed public key.
    pub fn address(&self) -> Address {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CTX, &self.0 .0);
        let uncompressed = public_key.serialize_uncompressed();
        Address(keccak256(&uncompressed[1..]).lower_20_bytes())
    }

    pub fn sign(&self, msg_hash: &Hash) -> Secp256k1Signature {
        let m = Message::from_digest_slice(msg_hash.as_ref()).expect("Hash is always a valid message");
        let signature = SECP256K1_CTX.sign_ecdsa_recoverable(&m, &self.0 .0);
        let (recovery_id, signature_data) = signature.serialize_compact();
        Secp256k1Signature::from_compact(recovery_id.to_i32() as u8, &signature_data)
    }

    pub fn from_hex(s: &str) -> Result<Self, ParsePrivateKeyError> {
        let digits = s.trim().strip_prefix("0x").unwrap_or(s.trim());
        hex::decode(digits)
            .map_err(|_| ParsePrivateKeyError::InvalidHex)
            .and_then(|v| Self::from_bytes(&v))
    }

    pub fn from_bytes(slice: &[u8]) -> Result<Self, ParsePrivateKeyError> {
        if slice.len() != PrivateKey::LENGTH {
            return Err(ParsePrivateKeyError::InvalidLength(slice.len()));
        }
        Ok(Self(SecretKeyWrapper(
            SecretKey::from_slice(slice).map_err(|_| ParsePrivateKeyError::InvalidKey)?,
        )))
    }
}

// Never print key material.
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrivateKey({})", self.address())
    }
}

/// Represents an error when parsing a private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePrivateKeyError {
    InvalidHex,
    InvalidLength(usize),
    InvalidKey,
}

impl std::error::Error for ParsePrivateKeyError {}

impl fmt::Display for ParsePrivateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_address() {
        let key = PrivateKey::from_hex(
            "0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(
            key.address().to_string(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );

        // First default account of a local development node.
        let key = PrivateKey::from_hex(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        assert_eq!(
            key.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            PrivateKey::from_hex("zz").unwrap_err(),
            ParsePrivateKeyError::InvalidHex
        );
        assert_eq!(
            PrivateKey::from_hex("0x0102").unwrap_err(),
            ParsePrivateKeyError::InvalidLength(2)
        );
        assert_eq!(
            PrivateKey::from_bytes(&[0u8; 32]).unwrap_err(),
            ParsePrivateKeyError::InvalidKey
        );
    }

    #[test]
    fn debug_does_not_leak_key() {
        let key = PrivateKey::from_hex(
            "4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap();
        assert!(!format!("{:?}", key).contains("4646"));
    }

    #[test]
    fn verify_zeroize() {
        let bytes = "4fd3fb62d6b7a4749f75d56d06b0aea1ec2c2a6986d2bfa975d7891585590fea";
        let mut key = PrivateKey::from_hex(bytes).unwrap();
        key.zeroize();

        assert_eq!(
            key.0 .0.secret_bytes(),
            SecretKeyWrapper::default().0.secret_bytes()
        );
    }
}
