use ethnum::{I256, U256};

use super::*;
use crate::types::Address;

/// Builds call data: a selector followed by one word per argument.
#[derive(Debug, Clone)]
pub struct CallEncoder {
    buf: Vec<u8>,
}

impl CallEncoder {
    pub fn new(signature: &str) -> Self {
        Self::with_selector(selector(signature))
    }

    pub fn with_selector(selector: Selector) -> Self {
        let mut buf = Vec::with_capacity(4 + 6 * WORD_LENGTH);
        buf.extend_from_slice(&selector);
        Self { buf }
    }

    pub fn address(mut self, address: Address) -> Self {
        self.buf.extend_from_slice(&encode_address(address));
        self
    }

    pub fn uint(mut self, value: U256) -> Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn int(mut self, value: I256) -> Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn uint16(self, value: u16) -> Self {
        self.uint(U256::from(value))
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Left-pads an address into a word.
pub fn encode_address(address: Address) -> [u8; WORD_LENGTH] {
    let mut word = [0u8; WORD_LENGTH];
    word[12..].copy_from_slice(&address.0);
    word
}

/// Encodes a list of words as return data, as a contract would.
pub fn encode_words(words: &[[u8; WORD_LENGTH]]) -> Vec<u8> {
    words.iter().flat_map(|w| w.iter().copied()).collect()
}
