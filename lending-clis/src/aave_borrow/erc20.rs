use lending_transactions::prelude::*;

use crate::aave_borrow::*;
use crate::contracts::Erc20;
use crate::txn::TransactionSubmitter;

/// Approves `spender` to pull `amount` of the token and waits until the approval is mined.
pub fn approve_erc20<P: Provider, O: std::io::Write>(
    submitter: &mut TransactionSubmitter<P>,
    token: Address,
    spender: Address,
    amount: U256,
    out: &mut O,
) -> Result<(), Error> {
    Erc20::at(token).approve(submitter, spender, amount)?;
    writeln!(out, "Approved!").map_err(Error::IOError)
}
