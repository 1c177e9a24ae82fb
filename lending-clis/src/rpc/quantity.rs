use lending_transactions::prelude::*;

/// Formats an integer as a JSON-RPC quantity: `0x`-prefixed hex without leading zeros.
pub fn format_quantity(value: U256) -> String {
    format!("0x{:x}", value)
}

pub fn parse_quantity(s: &str) -> Result<U256, ProviderError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ProviderError::InvalidResponse(format!("not a quantity: {}", s)))?;
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|_| ProviderError::InvalidResponse(format!("not a quantity: {}", s)))
}

pub fn parse_quantity_u64(s: &str) -> Result<u64, ProviderError> {
    let value = parse_quantity(s)?;
    let (high, low) = value.into_words();
    if high != 0 || low > u64::MAX as u128 {
        return Err(ProviderError::InvalidResponse(format!(
            "quantity out of range: {}",
            s
        )));
    }
    Ok(low as u64)
}

/// Formats bytes as `0x`-prefixed hex data.
pub fn format_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn parse_bytes(s: &str) -> Result<Vec<u8>, ProviderError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|_| ProviderError::InvalidResponse(format!("not hex data: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities() {
        assert_eq!(format_quantity(U256::ZERO), "0x0");
        assert_eq!(format_quantity(U256::new(1024)), "0x400");
        assert_eq!(parse_quantity("0x400").unwrap(), U256::new(1024));
        assert_eq!(parse_quantity("0x").unwrap(), U256::ZERO);
        assert_eq!(parse_quantity_u64("0x7a69").unwrap(), 31337);
        assert!(parse_quantity("400").is_err());
        assert!(parse_quantity_u64("0x10000000000000000").is_err());
    }

    #[test]
    fn test_bytes() {
        assert_eq!(format_bytes(&[]), "0x");
        assert_eq!(format_bytes(&[0xd0, 0xe3]), "0xd0e3");
        assert_eq!(parse_bytes("0xd0e3").unwrap(), vec![0xd0, 0xe3]);
        assert_eq!(parse_bytes("0x").unwrap(), Vec::<u8>::new());
        assert!(parse_bytes("0xzz").is_err());
    }
}
