//! Stable error codes for reporting rejected envelopes.
//!
//! Codes are intentionally coarse so a transport can tell a peer why an
//! envelope was dropped without disclosing internal detail. Detailed
//! errors stay in local logs.

use serde::{Deserialize, Serialize};

use crate::EnvelopeError;

/// Wire error codes, one per error category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ErrorCode {
    // === 1xxx: Structure ===
    /// Envelope bytes could not be decoded.
    MalformedEnvelope = 1000,

    // === 2xxx: Protocol mismatch ===
    /// Unknown protocol version.
    UnsupportedVersion = 2000,
    /// Unknown signature or cipher identifier.
    UnsupportedAlgorithm = 2001,

    // === 3xxx: Authenticity ===
    /// Signature missing or not well-formed.
    InvalidSignature = 3000,
    /// Signature does not match content or expected signer.
    SignatureVerificationFailed = 3001,

    // === 4xxx: Confidentiality ===
    /// Key material has the wrong shape.
    InvalidKeyMaterial = 4000,
    /// Key unwrap failed.
    DecryptionFailed = 4001,
    /// Plaintext MAC mismatch.
    AuthenticationFailed = 4002,

    // === 5xxx: Local ===
    /// Local configuration was rejected.
    InvalidConfiguration = 5000,
}

impl ErrorCode {
    /// Get the numeric code.
    #[must_use]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether retrying the same operation could succeed.
    ///
    /// Cryptographic rejections are never transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Whether the code indicates possible tampering or spoofing.
    #[must_use]
    pub fn is_tampering(&self) -> bool {
        matches!(
            self,
            Self::SignatureVerificationFailed | Self::AuthenticationFailed
        )
    }

    /// Get a generic description (safe to send over wire).
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::MalformedEnvelope => "malformed envelope",
            Self::UnsupportedVersion => "unsupported version",
            Self::UnsupportedAlgorithm => "unsupported algorithm",
            Self::InvalidSignature => "invalid signature",
            Self::SignatureVerificationFailed => "signature verification failed",
            Self::InvalidKeyMaterial => "invalid key material",
            Self::DecryptionFailed => "decryption failed",
            Self::AuthenticationFailed => "authentication failed",
            Self::InvalidConfiguration => "invalid configuration",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

impl From<&EnvelopeError> for ErrorCode {
    fn from(err: &EnvelopeError) -> Self {
        match err {
            EnvelopeError::MalformedEnvelope(_) => Self::MalformedEnvelope,
            EnvelopeError::UnsupportedVersion { .. } => Self::UnsupportedVersion,
            EnvelopeError::UnsupportedAlgorithm(_) => Self::UnsupportedAlgorithm,
            EnvelopeError::InvalidSignature(_) => Self::InvalidSignature,
            EnvelopeError::SignatureVerificationFailed => Self::SignatureVerificationFailed,
            EnvelopeError::InvalidKeyMaterial(_) => Self::InvalidKeyMaterial,
            EnvelopeError::DecryptionFailed => Self::DecryptionFailed,
            EnvelopeError::AuthenticationFailed => Self::AuthenticationFailed,
            EnvelopeError::Config(_) => Self::InvalidConfiguration,
        }
    }
}

impl EnvelopeError {
    /// The stable wire code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}
