use crate::crypto::keccak256;
use std::fmt;
use std::str::FromStr;

/// A 20-byte account or contract address.
///
/// Displayed with the mixed-case checksum encoding, e.g.
/// `0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; Self::LENGTH]);

impl Address {
    pub const LENGTH: usize = 20;

    pub const ZERO: Self = Self([0u8; Self::LENGTH]);

    /// Decodes 40 hex digits (no prefix) in a const context; invalid input fails compilation
    /// when used in a `const` item.
    pub const fn from_hex_literal(digits: &str) -> Self {
        const fn nibble(c: u8) -> u8 {
            match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                b'A'..=b'F' => c - b'A' + 10,
                _ => panic!("invalid hex digit in address literal"),
            }
        }

        let digits = digits.as_bytes();
        assert!(digits.len() == 2 * Self::LENGTH, "address literal must have 40 hex digits");
        let mut bytes = [0u8; Self::LENGTH];
        let mut i = 0;
        while i < Self::LENGTH {
            bytes[i] = (nibble(digits[2 * i]) << 4) | nibble(digits[2 * i + 1]);
            i += 1;
        }
        Self(bytes)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Returns the address with checksum casing applied to the hex digits.
    pub fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (digest.0[i / 2] >> (4 * (1 - i % 2))) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

//========
// error
//========

/// Represents an error when parsing an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAddressError {
    MissingPrefix,
    InvalidHex(String),
    InvalidLength(usize),
    InvalidChecksum,
}

impl std::error::Error for ParseAddressError {}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

//========
// binary
//========

impl TryFrom<&[u8]> for Address {
    type Error = ParseAddressError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; Self::LENGTH] = slice
            .try_into()
            .map_err(|_| ParseAddressError::InvalidLength(slice.len()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; Address::LENGTH]> for Address {
    fn from(bytes: [u8; Address::LENGTH]) -> Self {
        Self(bytes)
    }
}

//======
// text
//======

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(ParseAddressError::MissingPrefix)?;
        let bytes = hex::decode(digits).map_err(|_| ParseAddressError::InvalidHex(s.to_owned()))?;
        let address = Self::try_from(bytes.as_slice())?;

        // All-lowercase and all-uppercase inputs carry no checksum.
        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum_string()[2..] != *digits {
            return Err(ParseAddressError::InvalidChecksum);
        }
        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_checksum_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum_string())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
