//! Wire codec.
//!
//! The envelope travels as `bincode` with fixed-width little-endian
//! integers:
//!
//! ```text
//! version      u8
//! sig_alg      u64 len || utf-8
//! cipher_alg   u64 len || utf-8
//! payload      u64 len || bytes
//! wrapped_key  u64 len || bytes
//! iv           u64 len || bytes
//! mac          u64 len || bytes
//! signature    u64 len || bytes   (empty when unsigned)
//! ```
//!
//! Decoding is structural only. Trailing bytes, truncation and inputs
//! over the size limit are all rejected as malformed.

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::limits::MIN_ENVELOPE_SIZE;
use crate::{EnvelopeError, Result};

/// Owned form produced by the decoder.
#[derive(Debug, Deserialize)]
pub(crate) struct WireEnvelope {
    pub version: u8,
    pub signature_algorithm: String,
    pub cipher_algorithm: String,
    pub payload: Vec<u8>,
    pub wrapped_key: Vec<u8>,
    pub iv: Vec<u8>,
    pub mac: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Borrowed form fed to the encoder. Field order must match [`WireEnvelope`].
#[derive(Debug, Serialize)]
pub(crate) struct WireEnvelopeRef<'a> {
    pub version: u8,
    pub signature_algorithm: &'a str,
    pub cipher_algorithm: &'a str,
    pub payload: &'a [u8],
    pub wrapped_key: &'a [u8],
    pub iv: &'a [u8],
    pub mac: &'a [u8],
    pub signature: &'a [u8],
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

pub(crate) fn encode(envelope: &WireEnvelopeRef<'_>) -> Result<Vec<u8>> {
    options()
        .serialize(envelope)
        .map_err(|e| EnvelopeError::MalformedEnvelope(e.to_string()))
}

pub(crate) fn decode(bytes: &[u8], max_size: usize) -> Result<WireEnvelope> {
    // SECURITY: Check size BEFORE deserialization so a forged length
    // prefix cannot drive a huge allocation.
    if bytes.len() > max_size {
        return Err(EnvelopeError::MalformedEnvelope(format!(
            "envelope too large: {} bytes exceeds maximum {} bytes",
            bytes.len(),
            max_size
        )));
    }
    if bytes.len() < MIN_ENVELOPE_SIZE {
        return Err(EnvelopeError::MalformedEnvelope(format!(
            "envelope truncated: {} bytes",
            bytes.len()
        )));
    }

    options()
        .with_limit(max_size as u64)
        .deserialize(bytes)
        .map_err(|e| EnvelopeError::MalformedEnvelope(e.to_string()))
}
