use lending_transactions::prelude::*;

use crate::aave_borrow::Error;
use crate::txn::TransactionSubmitter;

pub const ADDRESSES_PROVIDER_GET_LENDING_POOL: &str = "getLendingPool()";

/// The registry that knows where the current lending pool is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LendingPoolAddressesProvider {
    pub address: Address,
}

impl LendingPoolAddressesProvider {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn get_lending_pool<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
    ) -> Result<Address, Error> {
        let data = CallEncoder::new(ADDRESSES_PROVIDER_GET_LENDING_POOL).build();
        let output = submitter.call(self.address, &data)?;
        Ok(WordDecoder::new(&output).address()?)
    }
}
