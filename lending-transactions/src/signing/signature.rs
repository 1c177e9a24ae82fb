/// A recoverable secp256k1 signature, split into the parts a transaction encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1Signature {
    pub recovery_id: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl Secp256k1Signature {
    /// Builds the signature from `recovery_id || r || s`.
    pub fn from_compact(recovery_id: u8, data: &[u8; 64]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&data[..32]);
        s.copy_from_slice(&data[32..]);
        Self { recovery_id, r, s }
    }
}
