/// Contract ABI word encoding and decoding.
pub mod abi;
/// Keccak hashing.
pub mod crypto;
/// Fixed-point token amount library.
pub mod math;
/// Network identifier and contract address model.
pub mod network;
/// Address types.
pub mod types;

/// Each module should have its own prelude, which:
/// * Adds preludes of upstream crates
/// * Exports types with specific-enough names which mean they can safely be used downstream.
pub mod prelude {
    // Exports from upstream libraries
    pub use ethnum::{I256, U256};

    // Exports from this crate
    pub use super::abi::*;
    pub use super::crypto::*;
    pub use super::math::*;
    pub use super::network::*;
    pub use super::types::*;
}
