//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid symmetric key length.
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length.
        expected: usize,
        /// Actual key length.
        actual: usize,
    },

    /// Invalid initialization vector length.
    #[error("Invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength {
        /// Expected IV length.
        expected: usize,
        /// Actual IV length.
        actual: usize,
    },

    /// Invalid hash length.
    #[error("Invalid hash length: expected {expected}, got {actual}")]
    InvalidHashLength {
        /// Expected hash length.
        expected: usize,
        /// Actual hash length.
        actual: usize,
    },

    /// Invalid hex string format.
    #[error("Invalid hex string: {0}")]
    InvalidHexFormat(String),

    /// The bytes do not encode a point on secp256k1.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// The bytes do not encode a valid secp256k1 scalar.
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signature has the wrong length, a high S value or a bad recovery id.
    #[error("Invalid signature: {0}")]
    InvalidSignature(&'static str),

    /// The signature does not correspond to the hash.
    #[error("Signature verification failed")]
    SignatureVerification,

    /// Producing a signature failed.
    #[error("Signing failed")]
    Signing,

    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (malformed ciphertext or wrong key).
    #[error("Decryption failed: invalid ciphertext or key")]
    Decryption,
}

/// Result type for cryptographic operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
