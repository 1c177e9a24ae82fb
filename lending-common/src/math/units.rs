use ethnum::U256;
use std::fmt;

use super::RoundingMode;

/// Largest `n` such that `10^n` fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

/// Returns `10^exp`, or `None` if it does not fit in a `U256`.
pub fn ten_pow(exp: u32) -> Option<U256> {
    if exp > MAX_DECIMALS as u32 {
        return None;
    }
    Some(U256::new(10).pow(exp))
}

/// Computes `a * b / divisor` with the given rounding.
///
/// Returns `None` if `divisor` is zero or the intermediate product overflows.
pub fn mul_div(a: U256, b: U256, divisor: U256, mode: RoundingMode) -> Option<U256> {
    if divisor == U256::ZERO {
        return None;
    }
    let product = a.checked_mul(b)?;
    let quotient = product / divisor;
    let remainder = product % divisor;
    match mode {
        RoundingMode::ToZero => Some(quotient),
        RoundingMode::MidpointAwayFromZero => {
            // remainder >= divisor - remainder  <=>  remainder * 2 >= divisor
            if remainder != U256::ZERO && remainder >= divisor - remainder {
                quotient.checked_add(U256::ONE)
            } else {
                Some(quotient)
            }
        }
    }
}

/// Formats an integer amount of minimal units as a decimal string with `decimals` fraction digits.
///
/// Trailing zeros of the fraction are trimmed, and an integral value prints without a point:
/// `format_units(1_500_000_000_000_000_000, 18) == "1.5"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let (quotient, remainder) = match ten_pow(decimals as u32) {
        Some(multiplier) => (value / multiplier, value % multiplier),
        // every U256 is below 10^78, so the integral part is zero
        None => (U256::ZERO, value),
    };

    if remainder != U256::ZERO {
        // print remainder with leading zeroes
        let rem_str = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
        format!("{}.{}", quotient, rem_str.trim_end_matches('0'))
    } else {
        format!("{}", quotient)
    }
}

/// Parses a non-negative decimal string into minimal units with `decimals` fraction digits.
pub fn parse_units(s: &str, decimals: u8) -> Result<U256, ParseUnitsError> {
    let multiplier = ten_pow(decimals as u32).ok_or(ParseUnitsError::UnsupportedDecimals(decimals))?;
    let v: Vec<&str> = s.split('.').collect();
    if v.len() > 2 || v[0].is_empty() {
        return Err(ParseUnitsError::InvalidDecimal(s.to_owned()));
    }

    let int = parse_digits(v[0])?
        .checked_mul(multiplier)
        .ok_or(ParseUnitsError::Overflow)?;

    if v.len() == 2 {
        let scale = (decimals as u32)
            .checked_sub(v[1].len() as u32)
            .ok_or(ParseUnitsError::UnsupportedDecimalPlace)?;
        if v[1].is_empty() {
            return Err(ParseUnitsError::InvalidDecimal(s.to_owned()));
        }
        let frac = parse_digits(v[1])? * U256::new(10).pow(scale);
        return int.checked_add(frac).ok_or(ParseUnitsError::Overflow);
    }
    Ok(int)
}

fn parse_digits(digits: &str) -> Result<U256, ParseUnitsError> {
    if let Some(c) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ParseUnitsError::InvalidChar(c));
    }
    U256::from_str_radix(digits, 10).map_err(|_| ParseUnitsError::Overflow)
}

/// An integer amount of a token's minimal units, together with the token's decimal count.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount {
    pub units: U256,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(units: U256, decimals: u8) -> Self {
        Self { units, decimals }
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format_units(self.units, self.decimals))
    }
}

impl fmt::Debug for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} units)", self, self.units)
    }
}

//========
// error
//========

/// Represents an error when parsing a decimal string into minimal units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseUnitsError {
    InvalidDecimal(String),
    InvalidChar(char),
    UnsupportedDecimalPlace,
    UnsupportedDecimals(u8),
    Overflow,
}

impl std::error::Error for ParseUnitsError {}

impl fmt::Display for ParseUnitsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
