//! Encoding and decoding of contract call data for functions whose parameters and return values
//! are all static 32-byte words (`address`, `uintN`, `intN`). This covers every contract
//! function the lending tooling calls.

mod decoder;
mod encoder;

pub use decoder::*;
pub use encoder::*;

use crate::crypto::keccak256;

/// Size of one ABI word.
pub const WORD_LENGTH: usize = 32;

/// A 4-byte function selector.
pub type Selector = [u8; 4];

/// Computes the selector of a canonical function signature, e.g. `approve(address,uint256)`.
pub fn selector(signature: &str) -> Selector {
    keccak256(signature.as_bytes()).upper_4_bytes()
}
