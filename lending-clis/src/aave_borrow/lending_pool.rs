use colored::*;
use lending_transactions::prelude::*;

use crate::aave_borrow::*;
use crate::contracts::{LendingPool, LendingPoolAddressesProvider, UserAccountData};
use crate::txn::TransactionSubmitter;

/// Looks up the current lending pool through the addresses provider.
pub fn get_lending_pool<P: Provider>(
    submitter: &mut TransactionSubmitter<P>,
    network: &NetworkDefinition,
) -> Result<LendingPool, Error> {
    let provider = LendingPoolAddressesProvider::at(network.lending_pool_addresses_provider);
    let address = provider.get_lending_pool(submitter)?;
    Ok(LendingPool::at(address))
}

/// Approves the pool for `amount` of `asset` and supplies it as collateral.
pub fn deposit_collateral<P: Provider, O: std::io::Write>(
    submitter: &mut TransactionSubmitter<P>,
    lending_pool: &LendingPool,
    asset: Address,
    amount: U256,
    out: &mut O,
) -> Result<(), Error> {
    approve_erc20(submitter, asset, lending_pool.address, amount, out)?;

    writeln!(out, "Depositing WETH...").map_err(Error::IOError)?;
    let on_behalf_of = submitter.address();
    lending_pool.deposit(submitter, asset, amount, on_behalf_of, REFERRAL_CODE)?;
    writeln!(out, "Deposited!").map_err(Error::IOError)
}

/// Reads the account's position and prints collateral, debt and remaining borrowing power.
pub fn get_borrow_user_data<P: Provider, O: std::io::Write>(
    submitter: &mut TransactionSubmitter<P>,
    lending_pool: &LendingPool,
    base_decimals: u8,
    out: &mut O,
) -> Result<UserAccountData, Error> {
    let user = submitter.address();
    let data = lending_pool.get_user_account_data(submitter, user)?;

    writeln!(
        out,
        "You have {} worth of ETH deposited.",
        format_units(data.total_collateral, base_decimals).green()
    )
    .map_err(Error::IOError)?;
    writeln!(
        out,
        "You have {} worth of ETH borrowed.",
        format_units(data.total_debt, base_decimals).green()
    )
    .map_err(Error::IOError)?;
    writeln!(
        out,
        "You can borrow {} worth of ETH.",
        format_units(data.available_borrows, base_decimals).green()
    )
    .map_err(Error::IOError)?;
    Ok(data)
}

/// Takes a variable-rate loan of `amount` of `asset`.
pub fn borrow_dai<P: Provider, O: std::io::Write>(
    submitter: &mut TransactionSubmitter<P>,
    lending_pool: &LendingPool,
    asset: Address,
    amount: U256,
    out: &mut O,
) -> Result<(), Error> {
    let on_behalf_of = submitter.address();
    lending_pool.borrow(
        submitter,
        asset,
        amount,
        VARIABLE_RATE_MODE,
        REFERRAL_CODE,
        on_behalf_of,
    )?;
    writeln!(out, "You've borrowed!").map_err(Error::IOError)
}

/// Approves the pool for `amount` of `asset` and repays that much of the variable-rate debt.
pub fn repay<P: Provider, O: std::io::Write>(
    submitter: &mut TransactionSubmitter<P>,
    lending_pool: &LendingPool,
    asset: Address,
    amount: U256,
    out: &mut O,
) -> Result<(), Error> {
    approve_erc20(submitter, asset, lending_pool.address, amount, out)?;

    let on_behalf_of = submitter.address();
    lending_pool.repay(submitter, asset, amount, VARIABLE_RATE_MODE, on_behalf_of)?;
    writeln!(out, "Repaid!").map_err(Error::IOError)
}
