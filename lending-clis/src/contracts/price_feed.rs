use lending_transactions::prelude::*;

use crate::aave_borrow::Error;
use crate::txn::TransactionSubmitter;

pub const PRICE_FEED_LATEST_ROUND_DATA: &str = "latestRoundData()";
pub const PRICE_FEED_DECIMALS: &str = "decimals()";

/// The answer of the latest oracle round, in units of `10^-decimals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    pub answer: I256,
    pub decimals: u8,
}

/// A price oracle exposing the aggregator interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFeed {
    pub address: Address,
}

impl PriceFeed {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    /// Returns the `answer` field of `latestRoundData()`.
    pub fn latest_answer<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
    ) -> Result<I256, Error> {
        let data = CallEncoder::new(PRICE_FEED_LATEST_ROUND_DATA).build();
        let output = submitter.call(self.address, &data)?;
        let mut decoder = WordDecoder::new(&output);
        // roundId
        decoder.skip()?;
        Ok(decoder.int()?)
    }

    pub fn decimals<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
    ) -> Result<u8, Error> {
        let data = CallEncoder::new(PRICE_FEED_DECIMALS).build();
        let output = submitter.call(self.address, &data)?;
        Ok(WordDecoder::new(&output).uint8()?)
    }

    pub fn latest_quote<P: Provider>(
        &self,
        submitter: &mut TransactionSubmitter<P>,
    ) -> Result<PriceQuote, Error> {
        Ok(PriceQuote {
            answer: self.latest_answer(submitter)?,
            decimals: self.decimals(submitter)?,
        })
    }
}
