//! Typed bindings for the contracts the borrowing flow calls.
//!
//! Each binding holds the contract address; reads go through `eth_call` and writes are sent
//! through a [`TransactionSubmitter`](crate::txn::TransactionSubmitter), which waits for
//! confirmation before returning.

mod addresses_provider;
mod erc20;
mod lending_pool;
mod price_feed;
mod weth;

pub use addresses_provider::*;
pub use erc20::*;
pub use lending_pool::*;
pub use price_feed::*;
pub use weth::*;
