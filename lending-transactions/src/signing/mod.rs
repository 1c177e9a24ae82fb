mod private_key;
mod signature;
mod signer;

pub use private_key::*;
pub use signature::*;
pub use signer::*;
