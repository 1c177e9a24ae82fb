use ethnum::{I256, U256};
use std::fmt;

use super::*;
use crate::types::Address;

/// Represents an error when decoding return data or call data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiDecodeError {
    /// Fewer bytes than the next word requires.
    BufferUnderflow { required: usize, remaining: usize },
    /// Call data shorter than a selector.
    MissingSelector,
    /// The word does not hold a value of the expected type.
    InvalidValue(&'static str),
}

impl std::error::Error for AbiDecodeError {}

impl fmt::Display for AbiDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Reads consecutive words from return data or call arguments.
pub struct WordDecoder<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> WordDecoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Splits call data into its selector and a decoder over the arguments.
    pub fn for_call(data: &'a [u8]) -> Result<(Selector, Self), AbiDecodeError> {
        if data.len() < 4 {
            return Err(AbiDecodeError::MissingSelector);
        }
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);
        Ok((selector, Self::new(&data[4..])))
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    fn word(&mut self) -> Result<[u8; WORD_LENGTH], AbiDecodeError> {
        if self.remaining() < WORD_LENGTH {
            return Err(AbiDecodeError::BufferUnderflow {
                required: WORD_LENGTH,
                remaining: self.remaining(),
            });
        }
        let mut word = [0u8; WORD_LENGTH];
        word.copy_from_slice(&self.input[self.offset..self.offset + WORD_LENGTH]);
        self.offset += WORD_LENGTH;
        Ok(word)
    }

    pub fn skip(&mut self) -> Result<(), AbiDecodeError> {
        self.word().map(|_| ())
    }

    pub fn uint(&mut self) -> Result<U256, AbiDecodeError> {
        Ok(U256::from_be_bytes(self.word()?))
    }

    pub fn int(&mut self) -> Result<I256, AbiDecodeError> {
        Ok(I256::from_be_bytes(self.word()?))
    }

    pub fn uint8(&mut self) -> Result<u8, AbiDecodeError> {
        narrow(self.uint()?, u8::MAX as u128)
            .map(|v| v as u8)
            .ok_or(AbiDecodeError::InvalidValue("uint8"))
    }

    pub fn uint16(&mut self) -> Result<u16, AbiDecodeError> {
        narrow(self.uint()?, u16::MAX as u128)
            .map(|v| v as u16)
            .ok_or(AbiDecodeError::InvalidValue("uint16"))
    }

    pub fn address(&mut self) -> Result<Address, AbiDecodeError> {
        let word = self.word()?;
        if word[..12].iter().any(|b| *b != 0) {
            return Err(AbiDecodeError::InvalidValue("address"));
        }
        let mut bytes = [0u8; Address::LENGTH];
        bytes.copy_from_slice(&word[12..]);
        Ok(Address(bytes))
    }
}

fn narrow(value: U256, max: u128) -> Option<u128> {
    let (high, low) = value.into_words();
    (high == 0 && low <= max).then_some(low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_account_data_words() {
        let words: Vec<[u8; WORD_LENGTH]> = (1u128..=6)
            .map(|i| U256::new(i * 1_000).to_be_bytes())
            .collect();
        let data = encode_words(&words);
        let mut decoder = WordDecoder::new(&data);

        assert_eq!(decoder.uint().unwrap(), U256::new(1_000));
        decoder.skip().unwrap();
        assert_eq!(decoder.uint().unwrap(), U256::new(3_000));
        assert_eq!(decoder.remaining(), 3 * WORD_LENGTH);
    }

    #[test]
    fn test_decode_call_arguments() {
        let owner = Address([0x11; 20]);
        let data = CallEncoder::new("transfer(address,uint256)")
            .address(owner)
            .uint16(7)
            .build();
        let (sel, mut args) = WordDecoder::for_call(&data).unwrap();

        assert_eq!(sel, selector("transfer(address,uint256)"));
        assert_eq!(args.address().unwrap(), owner);
        assert_eq!(args.uint16().unwrap(), 7);
        assert_eq!(
            args.uint(),
            Err(AbiDecodeError::BufferUnderflow {
                required: WORD_LENGTH,
                remaining: 0
            })
        );
    }

    #[test]
    fn test_decode_negative_answer() {
        let data = encode_words(&[I256::new(-5).to_be_bytes()]);
        assert_eq!(WordDecoder::new(&data).int().unwrap(), I256::new(-5));
    }

    #[test]
    fn test_reject_dirty_address_word() {
        let data = encode_words(&[[0xff; WORD_LENGTH]]);
        assert_eq!(
            WordDecoder::new(&data).address(),
            Err(AbiDecodeError::InvalidValue("address"))
        );
        assert_eq!(
            WordDecoder::for_call(&[0x01, 0x02]).err(),
            Some(AbiDecodeError::MissingSelector)
        );
    }
}
