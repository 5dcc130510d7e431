//! Error types for envelope operations.
//!
//! Every failure falls into one of a small, fixed set of categories. None
//! of them are transient: a rejected envelope stays rejected.

use secretly_crypto::CryptoError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while building, decoding, validating or opening
/// an envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Structural decode failure (truncated, trailing bytes, oversize).
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The envelope was produced for a different protocol revision.
    #[error("Unsupported envelope version: expected {expected}, got {actual}")]
    UnsupportedVersion {
        /// The only version this implementation accepts.
        expected: u8,
        /// The version found in the envelope.
        actual: u8,
    },

    /// Signature or cipher identifier is not the pinned value.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signature is absent, has the wrong length or is not canonical.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Signature does not correspond to the content hash or expected signer.
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Key or IV has the wrong length or encoding.
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Unwrapping the one-time key failed (usually the wrong private key).
    #[error("Decryption failed")]
    DecryptionFailed,

    /// The MAC over the recovered plaintext does not match.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Open policy configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<CryptoError> for EnvelopeError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidKeyLength { .. }
            | CryptoError::InvalidIvLength { .. }
            | CryptoError::InvalidHashLength { .. }
            | CryptoError::InvalidHexFormat(_)
            | CryptoError::InvalidPublicKey
            | CryptoError::InvalidPrivateKey => Self::InvalidKeyMaterial(err.to_string()),
            CryptoError::InvalidSignature(reason) => Self::InvalidSignature(reason.to_string()),
            CryptoError::SignatureVerification | CryptoError::Signing => {
                Self::SignatureVerificationFailed
            }
            CryptoError::Encryption(_) | CryptoError::Decryption => Self::DecryptionFailed,
        }
    }
}

/// Result type for envelope operations.
pub type Result<T> = std::result::Result<T, EnvelopeError>;
