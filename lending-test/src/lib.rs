mod simulated;
mod test_ledger;

pub use simulated::*;
pub use test_ledger::*;
