use lending_transactions::prelude::*;

use super::Erc20;
use crate::aave_borrow::Error;
use crate::txn::TransactionSubmitter;

pub const WETH_DEPOSIT: &str = "deposit()";

/// The wrapped native currency: an ERC-20 that mints one token per unit of value sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weth {
    pub token: Erc20,
}

impl Weth {
    pub fn at(address: Address) -> Self {
        Self {
            token: Erc20::at(address),
        }
    }

    /// Wraps `value` of native currency into tokens owned by the sender.
    pub fn deposit<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
        value: U256,
    ) -> Result<TransactionReceipt, Error> {
        let data = CallEncoder::new(WETH_DEPOSIT).build();
        submitter.send(self.token.address, data, value)
    }
}
