/// The `aave-borrow` CLI.
pub mod aave_borrow;
/// Typed contract bindings.
pub mod contracts;
/// The HTTP JSON-RPC node client.
pub mod rpc;
/// Transaction submission and confirmation.
pub mod txn;
