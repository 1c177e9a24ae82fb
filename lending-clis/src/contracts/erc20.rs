use lending_transactions::prelude::*;

use crate::aave_borrow::Error;
use crate::txn::TransactionSubmitter;

pub const ERC20_APPROVE: &str = "approve(address,uint256)";
pub const ERC20_BALANCE_OF: &str = "balanceOf(address)";
pub const ERC20_DECIMALS: &str = "decimals()";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Erc20 {
    pub address: Address,
}

impl Erc20 {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    /// Allows `spender` to pull up to `amount` of this token from the sender.
    pub fn approve<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
        spender: Address,
        amount: U256,
    ) -> Result<TransactionReceipt, Error> {
        let data = CallEncoder::new(ERC20_APPROVE)
            .address(spender)
            .uint(amount)
            .build();
        submitter.send(self.address, data, U256::ZERO)
    }

    pub fn balance_of<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
        owner: Address,
    ) -> Result<U256, Error> {
        let data = CallEncoder::new(ERC20_BALANCE_OF).address(owner).build();
        let output = submitter.call(self.address, &data)?;
        Ok(WordDecoder::new(&output).uint()?)
    }

    pub fn decimals<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
    ) -> Result<u8, Error> {
        let output = submitter.call(self.address, &CallEncoder::new(ERC20_DECIMALS).build())?;
        Ok(WordDecoder::new(&output).uint8()?)
    }
}
