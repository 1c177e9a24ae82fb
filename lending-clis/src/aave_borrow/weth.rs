use colored::*;
use lending_transactions::prelude::*;

use crate::aave_borrow::*;
use crate::contracts::Weth;
use crate::txn::TransactionSubmitter;

/// Wraps `amount` of native currency and prints the resulting wrapped-token balance.
pub fn get_weth<P: Provider, O: std::io::Write>(
    submitter: &mut TransactionSubmitter<P>,
    network: &NetworkDefinition,
    amount: U256,
    out: &mut O,
) -> Result<U256, Error> {
    let weth = Weth::at(network.weth_token);
    weth.deposit(submitter, amount)?;

    let owner = submitter.address();
    let balance = weth.token.balance_of(submitter, owner)?;
    writeln!(
        out,
        "Got {} WETH",
        format_units(balance, NATIVE_DECIMALS).green()
    )
    .map_err(Error::IOError)?;
    Ok(balance)
}
