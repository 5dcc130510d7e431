//! Keccak-256 hashing primitives.
//!
//! Provides a 256-bit hash type using the legacy Keccak padding (the
//! variant used by Ethereum, not FIPS-202 SHA3-256).

use sha3::{Digest, Keccak256};
use subtle::ConstantTimeEq;

use crate::{CryptoError, Result};

/// A 256-bit (32-byte) Keccak hash value.
#[derive(Clone, Copy)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    /// Hash size in bytes.
    pub const SIZE: usize = 32;

    /// Create a Hash256 from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidHashLength {
                expected: Self::SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Get the hash as a byte slice.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to owned byte array.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Hash a single input.
    pub fn hash(data: &[u8]) -> Self {
        Self(Keccak256::digest(data).into())
    }

    /// Hash the plain concatenation of several inputs.
    ///
    /// Only unambiguous when every input but one has a fixed length.
    pub fn hash_concat(inputs: &[&[u8]]) -> Self {
        let mut hasher = Keccak256::new();
        for input in inputs {
            hasher.update(input);
        }
        Self(hasher.finalize().into())
    }

    /// Constant-time comparison against raw bytes of any length.
    pub fn ct_eq_slice(&self, other: &[u8]) -> bool {
        other.len() == Self::SIZE && bool::from(self.0.as_slice().ct_eq(other))
    }

    /// Format as lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != Self::SIZE * 2 {
            return Err(CryptoError::InvalidHashLength {
                expected: Self::SIZE * 2,
                actual: s.len(),
            });
        }
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHexFormat(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl ConstantTimeEq for Hash256 {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Hash256 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Hash256 {}

impl std::hash::Hash for Hash256 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Bucket selection only, not a cryptographic use.
        self.0.hash(state);
    }
}

impl std::fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash256({})", &self.to_hex()[..16])
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
