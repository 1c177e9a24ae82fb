use lending_transactions::prelude::*;

use crate::aave_borrow::Error;
use crate::txn::TransactionSubmitter;

pub const LENDING_POOL_DEPOSIT: &str = "deposit(address,uint256,address,uint16)";
pub const LENDING_POOL_BORROW: &str = "borrow(address,uint256,uint256,uint16,address)";
pub const LENDING_POOL_REPAY: &str = "repay(address,uint256,uint256,address)";
pub const LENDING_POOL_GET_USER_ACCOUNT_DATA: &str = "getUserAccountData(address)";

/// An account's position in the pool. The first three figures are in the pool's base currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAccountData {
    pub total_collateral: U256,
    pub total_debt: U256,
    pub available_borrows: U256,
    pub current_liquidation_threshold: U256,
    pub ltv: U256,
    pub health_factor: U256,
}

impl UserAccountData {
    pub fn decode(output: &[u8]) -> Result<Self, AbiDecodeError> {
        let mut decoder = WordDecoder::new(output);
        Ok(Self {
            total_collateral: decoder.uint()?,
            total_debt: decoder.uint()?,
            available_borrows: decoder.uint()?,
            current_liquidation_threshold: decoder.uint()?,
            ltv: decoder.uint()?,
            health_factor: decoder.uint()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LendingPool {
    pub address: Address,
}

impl LendingPool {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    /// Supplies `amount` of `asset`, which the pool must already be approved to pull.
    pub fn deposit<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u16,
    ) -> Result<TransactionReceipt, Error> {
        let data = CallEncoder::new(LENDING_POOL_DEPOSIT)
            .address(asset)
            .uint(amount)
            .address(on_behalf_of)
            .uint16(referral_code)
            .build();
        submitter.send(self.address, data, U256::ZERO)
    }

    pub fn borrow<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
        asset: Address,
        amount: U256,
        interest_rate_mode: u8,
        referral_code: u16,
        on_behalf_of: Address,
    ) -> Result<TransactionReceipt, Error> {
        let data = CallEncoder::new(LENDING_POOL_BORROW)
            .address(asset)
            .uint(amount)
            .uint(U256::from(interest_rate_mode))
            .uint16(referral_code)
            .address(on_behalf_of)
            .build();
        submitter.send(self.address, data, U256::ZERO)
    }

    pub fn repay<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
        asset: Address,
        amount: U256,
        rate_mode: u8,
        on_behalf_of: Address,
    ) -> Result<TransactionReceipt, Error> {
        let data = CallEncoder::new(LENDING_POOL_REPAY)
            .address(asset)
            .uint(amount)
            .uint(U256::from(rate_mode))
            .address(on_behalf_of)
            .build();
        submitter.send(self.address, data, U256::ZERO)
    }

    pub fn get_user_account_data<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
        user: Address,
    ) -> Result<UserAccountData, Error> {
        let data = CallEncoder::new(LENDING_POOL_GET_USER_ACCOUNT_DATA)
            .address(user)
            .build();
        let output = submitter.call(self.address, &data)?;
        Ok(UserAccountData::decode(&output)?)
    }
}
