mod config;
mod erc20;
mod error;
mod lending_pool;
mod price;
mod weth;

pub use config::*;
pub use erc20::*;
pub use error::*;
pub use lending_pool::*;
pub use price::*;
pub use weth::*;

use clap::Parser;
use lending_transactions::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

use crate::contracts::{Erc20, UserAccountData};
use crate::rpc::JsonRpcProvider;
use crate::txn::{Account, TransactionSubmitter, DEFAULT_POLL_INTERVAL};

/// Native currency wrapped and deposited as collateral: 0.02 ETH.
pub const AMOUNT: U256 = U256::new(20_000_000_000_000_000);
/// Sent with deposits and borrows. Zero means no referral.
pub const REFERRAL_CODE: u16 = 0;
/// Variable interest rate. Stable rate borrowing is not used.
pub const VARIABLE_RATE_MODE: u8 = 2;
/// Share of the available borrowing power that is borrowed, in basis points.
pub const BORROW_SAFETY_MARGIN_BPS: u16 = 9500;
/// One hundred percent, in basis points.
pub const BPS_DENOMINATOR: u16 = 10_000;
/// Blocks a state change must be included in before the next step runs.
pub const CONFIRMATIONS: u64 = 1;

/// Deposit ETH into the lending pool, borrow DAI against it and repay the loan
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, name = "aave-borrow")]
pub struct AaveBorrowCli {
    /// The JSON-RPC endpoint of the node, defaults to $RPC_URL or http://127.0.0.1:8545
    #[clap(long)]
    pub rpc_url: Option<String>,

    /// A JSON file with network definitions that extend or override the built-in ones
    #[clap(long)]
    pub network_config: Option<PathBuf>,

    /// The network the node is expected to serve (mainnet or localhost), checked against its chain id
    #[clap(long)]
    pub network: Option<NetworkDefinition>,

    /// Seconds to wait for each transaction to be confirmed
    #[clap(long, default_value = "300")]
    pub timeout_secs: u64,
}

/// The account positions observed along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowReport {
    pub deposited: U256,
    pub after_deposit: UserAccountData,
    pub borrowed: U256,
    pub after_borrow: UserAccountData,
    pub after_repay: UserAccountData,
}

pub fn run() -> Result<(), Error> {
    let cli = AaveBorrowCli::parse();
    let mut out = std::io::stdout();
    cli.run(&mut out).map(|_| ())
}

impl AaveBorrowCli {
    pub fn run<O: std::io::Write>(&self, out: &mut O) -> Result<BorrowReport, Error> {
        let definitions = get_network_definitions(self.network_config.as_deref())?;
        let mut provider = JsonRpcProvider::new(&get_rpc_url(self.rpc_url.as_deref()));

        let chain_id = provider.chain_id()?;
        let network = select_network(&definitions, self.network.as_ref(), chain_id)?;
        let account = Account::resolve(&mut provider, get_private_key()?)?;

        let mut submitter = TransactionSubmitter::new(provider, account, chain_id)
            .with_confirmations(CONFIRMATIONS)
            .with_wait(Duration::from_secs(self.timeout_secs), DEFAULT_POLL_INTERVAL);
        run_with(&mut submitter, &network, out)
    }
}

/// Wraps, deposits, borrows and repays, stopping at the first failed step.
pub fn run_with<P: Provider, O: std::io::Write>(
    submitter: &mut TransactionSubmitter<P>,
    network: &NetworkDefinition,
    out: &mut O,
) -> Result<BorrowReport, Error> {
    get_weth(submitter, network, AMOUNT, out)?;
    let lending_pool = get_lending_pool(submitter, network)?;

    deposit_collateral(submitter, &lending_pool, network.weth_token, AMOUNT, out)?;

    let after_deposit =
        get_borrow_user_data(submitter, &lending_pool, network.base_currency_decimals, out)?;
    let quote = get_dai_price(submitter, network, out)?;
    let dai_decimals = Erc20::at(network.dai_token).decimals(submitter)?;
    let amount = compute_borrow_amount(
        after_deposit.available_borrows,
        network.base_currency_decimals,
        &quote,
        dai_decimals,
    )?;
    writeln!(
        out,
        "You can borrow {} DAI",
        TokenAmount::new(amount, dai_decimals)
    )
    .map_err(Error::IOError)?;

    borrow_dai(submitter, &lending_pool, network.dai_token, amount, out)?;
    let after_borrow =
        get_borrow_user_data(submitter, &lending_pool, network.base_currency_decimals, out)?;

    repay(submitter, &lending_pool, network.dai_token, amount, out)?;
    let after_repay =
        get_borrow_user_data(submitter, &lending_pool, network.base_currency_decimals, out)?;

    Ok(BorrowReport {
        deposited: AMOUNT,
        after_deposit,
        borrowed: amount,
        after_borrow,
        after_repay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = AaveBorrowCli::try_parse_from(["aave-borrow"]).unwrap();
        assert_eq!(cli.rpc_url, None);
        assert_eq!(cli.network, None);
        assert_eq!(cli.timeout_secs, 300);

        let cli = AaveBorrowCli::try_parse_from([
            "aave-borrow",
            "--rpc-url",
            "http://node:8545",
            "--network",
            "Hardhat",
            "--timeout-secs",
            "30",
        ])
        .unwrap();
        assert_eq!(cli.rpc_url.as_deref(), Some("http://node:8545"));
        assert_eq!(cli.network, Some(NetworkDefinition::localhost()));
        assert_eq!(cli.timeout_secs, 30);

        assert!(AaveBorrowCli::try_parse_from(["aave-borrow", "--network", "goerli"]).is_err());
    }
}
