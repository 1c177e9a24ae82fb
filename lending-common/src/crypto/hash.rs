use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Represents a 32-byte Keccak-256 digest, used as transaction and block hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash(pub [u8; Self::LENGTH]);

impl Hash {
    pub const LENGTH: usize = 32;

    /// Returns the lower 20 bytes, which is how account addresses are derived from key hashes.
    pub fn lower_20_bytes(&self) -> [u8; 20] {
        let mut result = [0u8; 20];
        result.copy_from_slice(&self.0[12..32]);
        result
    }

    /// Returns the first 4 bytes, which is how function selectors are derived from signatures.
    pub fn upper_4_bytes(&self) -> [u8; 4] {
        let mut result = [0u8; 4];
        result.copy_from_slice(&self.0[..4]);
        result
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Computes the Keccak-256 digest of a message.
pub fn keccak256<T: AsRef<[u8]>>(data: T) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let mut digest = [0u8; Hash::LENGTH];
    digest.copy_from_slice(&hasher.finalize());
    Hash(digest)
}

//========
// error
//========

/// Represents an error when parsing hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseHashError {
    InvalidHex(String),
    InvalidLength(usize),
}

impl std::error::Error for ParseHashError {}

impl fmt::Display for ParseHashError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

//========
// binary
//========

impl TryFrom<&[u8]> for Hash {
    type Error = ParseHashError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; Self::LENGTH] = slice
            .try_into()
            .map_err(|_| ParseHashError::InvalidLength(slice.len()))?;
        Ok(Self(bytes))
    }
}

//======
// text
//======

impl FromStr for Hash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| ParseHashError::InvalidHex(s.to_owned()))?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl serde::Serialize for Hash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Hash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
