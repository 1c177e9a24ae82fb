mod legacy_transaction;
mod rlp;
mod transaction_request;

pub use legacy_transaction::*;
pub use rlp::*;
pub use transaction_request::*;
