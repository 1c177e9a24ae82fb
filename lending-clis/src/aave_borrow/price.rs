use colored::*;
use lending_transactions::prelude::*;

use crate::aave_borrow::*;
use crate::contracts::{PriceFeed, PriceQuote};
use crate::txn::TransactionSubmitter;

/// Reads the stablecoin's price in base currency from the price feed.
pub fn get_dai_price<P: Provider, O: std::io::Write>(
    submitter: &mut TransactionSubmitter<P>,
    network: &NetworkDefinition,
    out: &mut O,
) -> Result<PriceQuote, Error> {
    let quote = PriceFeed::at(network.dai_eth_price_feed).latest_quote(submitter)?;
    writeln!(
        out,
        "The DAI/ETH price is {}",
        quote.answer.to_string().green()
    )
    .map_err(Error::IOError)?;
    Ok(quote)
}

/// Converts a share of the available borrowing power into the borrowed token's minimal units.
///
/// `available * 9500 * 10^(feed_decimals + token_decimals) / (10000 * price * 10^base_decimals)`,
/// truncated toward zero.
pub fn compute_borrow_amount(
    available_borrows: U256,
    base_decimals: u8,
    quote: &PriceQuote,
    token_decimals: u8,
) -> Result<U256, Error> {
    if quote.answer <= I256::ZERO {
        return Err(Error::InvalidPrice(quote.answer));
    }
    let price = U256::from_be_bytes(quote.answer.to_be_bytes());

    let numerator_scale = ten_pow(quote.decimals as u32 + token_decimals as u32)
        .and_then(|scale| scale.checked_mul(U256::from(BORROW_SAFETY_MARGIN_BPS)))
        .ok_or(Error::ArithmeticOverflow)?;
    let denominator = ten_pow(base_decimals as u32)
        .and_then(|scale| scale.checked_mul(price))
        .and_then(|d| d.checked_mul(U256::from(BPS_DENOMINATOR)))
        .ok_or(Error::ArithmeticOverflow)?;

    mul_div(
        available_borrows,
        numerator_scale,
        denominator,
        RoundingMode::ToZero,
    )
    .ok_or(Error::ArithmeticOverflow)
}
