//! Canonical encoding of the signed field set.
//!
//! ## Layout
//!
//! ```text
//! "SECRETLY-v1.ENVELOPE-HASH"
//! for field in [version, sig_alg, cipher_alg, payload, wrapped_key, iv, mac]:
//!     len(field) as u64 LE || field
//! ```
//!
//! The version is a single byte, algorithms are their wire identifiers.
//! The signature is never part of the encoding. Changing the field set or
//! its order requires a new envelope version.

use secretly_crypto::Hash256;

use crate::limits::ENVELOPE_HASH_DOMAIN;
use crate::suite::{CipherAlgorithm, SignatureAlgorithm};

/// Borrowed view of every field covered by the signature.
#[derive(Clone, Copy, Debug)]
pub struct SignedFields<'a> {
    /// Protocol version.
    pub version: u8,
    /// Signature algorithm.
    pub signature_algorithm: SignatureAlgorithm,
    /// Payload cipher.
    pub cipher_algorithm: CipherAlgorithm,
    /// Encrypted content.
    pub payload: &'a [u8],
    /// One-time key wrapped to the recipient.
    pub wrapped_key: &'a [u8],
    /// Payload IV.
    pub iv: &'a [u8],
    /// MAC over plaintext and one-time key.
    pub mac: &'a [u8],
}

impl SignedFields<'_> {
    /// Deterministic byte encoding of the fields.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let fields: [&[u8]; 7] = [
            &[self.version],
            self.signature_algorithm.as_str().as_bytes(),
            self.cipher_algorithm.as_str().as_bytes(),
            self.payload,
            self.wrapped_key,
            self.iv,
            self.mac,
        ];

        let body: usize = fields.iter().map(|f| 8 + f.len()).sum();
        let mut out = Vec::with_capacity(ENVELOPE_HASH_DOMAIN.len() + body);
        out.extend_from_slice(ENVELOPE_HASH_DOMAIN);
        for field in fields {
            out.extend_from_slice(&(field.len() as u64).to_le_bytes());
            out.extend_from_slice(field);
        }
        out
    }

    /// Keccak-256 of the canonical bytes. This is the value that is signed.
    pub fn content_hash(&self) -> Hash256 {
        Hash256::hash(&self.canonical_bytes())
    }
}
