//! The pinned algorithm suite.
//!
//! Algorithm identifiers travel as strings on the wire but are parsed into
//! closed enums at decode time. There is no negotiation: each enum has
//! exactly the variants this version supports, so an unknown identifier
//! never produces an `Envelope` value.

use std::fmt;
use std::str::FromStr;

use crate::limits::{CIPHER_ALGORITHM_ID, SIGNATURE_ALGORITHM_ID};
use crate::EnvelopeError;

/// Signature algorithm used to sign the content hash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// Recoverable ECDSA over secp256k1.
    #[default]
    Secp256k1,
}

impl SignatureAlgorithm {
    /// The wire identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Secp256k1 => SIGNATURE_ALGORITHM_ID,
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SIGNATURE_ALGORITHM_ID => Ok(Self::Secp256k1),
            other => Err(EnvelopeError::UnsupportedAlgorithm(format!(
                "signature algorithm {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symmetric cipher used for the payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CipherAlgorithm {
    /// AES with a 128-bit key in counter mode.
    #[default]
    Aes128Ctr,
}

impl CipherAlgorithm {
    /// The wire identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Aes128Ctr => CIPHER_ALGORITHM_ID,
        }
    }
}

impl FromStr for CipherAlgorithm {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CIPHER_ALGORITHM_ID => Ok(Self::Aes128Ctr),
            other => Err(EnvelopeError::UnsupportedAlgorithm(format!(
                "cipher {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
