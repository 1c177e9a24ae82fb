use crate::internal_prelude::*;

/// Appends RLP items to a buffer. Lists are built with [`RlpEncoder::list`].
#[derive(Debug, Default, Clone)]
pub struct RlpEncoder {
    buf: Vec<u8>,
}

impl RlpEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        if bytes.len() == 1 && bytes[0] < 0x80 {
            self.buf.push(bytes[0]);
        } else {
            write_header(&mut self.buf, 0x80, bytes.len());
            self.buf.extend_from_slice(bytes);
        }
        self
    }

    /// Integers are encoded big-endian without leading zeros; zero is the empty string.
    pub fn uint(self, value: U256) -> Self {
        let be = value.to_be_bytes();
        let first = be.iter().position(|b| *b != 0).unwrap_or(be.len());
        self.bytes(&be[first..])
    }

    pub fn u64(self, value: u64) -> Self {
        self.uint(U256::from(value))
    }

    pub fn address(self, address: Address) -> Self {
        self.bytes(&address.0)
    }

    /// Wraps the items appended so far into a single list.
    pub fn list(self) -> Self {
        let mut buf = Vec::with_capacity(self.buf.len() + 9);
        write_header(&mut buf, 0xc0, self.buf.len());
        buf.extend_from_slice(&self.buf);
        Self { buf }
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

fn write_header(buf: &mut Vec<u8>, offset: u8, len: usize) {
    if len <= 55 {
        buf.push(offset + len as u8);
    } else {
        let be = (len as u64).to_be_bytes();
        let first = be.iter().position(|b| *b != 0).unwrap_or(be.len() - 1);
        buf.push(offset + 55 + (be.len() - first) as u8);
        buf.extend_from_slice(&be[first..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_strings() {
        assert_eq!(RlpEncoder::new().bytes(b"dog").build(), b"\x83dog");
        assert_eq!(RlpEncoder::new().bytes(&[]).build(), [0x80]);
        assert_eq!(RlpEncoder::new().bytes(&[0x0f]).build(), [0x0f]);
        assert_eq!(RlpEncoder::new().bytes(&[0x80]).build(), [0x81, 0x80]);

        let long = [b'a'; 56];
        let encoded = RlpEncoder::new().bytes(&long).build();
        assert_eq!(&encoded[..2], &[0xb8, 56]);
        assert_eq!(encoded.len(), 58);
    }

    #[test]
    fn test_encode_integers() {
        assert_eq!(RlpEncoder::new().u64(0).build(), [0x80]);
        assert_eq!(RlpEncoder::new().u64(15).build(), [0x0f]);
        assert_eq!(RlpEncoder::new().u64(1024).build(), [0x82, 0x04, 0x00]);
    }

    #[test]
    fn test_encode_lists() {
        assert_eq!(RlpEncoder::new().list().build(), [0xc0]);
        assert_eq!(
            RlpEncoder::new().bytes(b"cat").bytes(b"dog").list().build(),
            b"\xc8\x83cat\x83dog"
        );
    }
}
