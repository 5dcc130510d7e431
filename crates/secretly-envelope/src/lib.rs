//! # secretly-envelope
//!
//! Sealed, authenticated message envelopes with a recoverable sender.
//!
//! This crate provides:
//! - **Envelope**: Encrypted, signed message unit and its lifecycle
//! - **seal / open**: One-call helpers over the lifecycle
//! - **KeyProvider**: Caller-owned source of private keys
//! - **OpenConfig**: Policy for accepting received envelopes
//!
//! ## Design
//!
//! - Content is encrypted under a one-time AES-128-CTR key
//! - The one-time key is wrapped to the recipient with ECIES
//! - A Keccak-256 MAC over plaintext and key is checked after decryption
//! - The sender is recovered from a secp256k1 signature, never sent in clear
//! - The algorithm suite is pinned; there is no negotiation

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod encryption;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod limits;
pub mod suite;
pub mod wire_error;

#[cfg(test)]
mod proptests;

pub use config::{ConfigError, OpenConfig, OpenConfigBuilder};
pub use encryption::{open, seal, OpenedEnvelope};
pub use envelope::{Envelope, EnvelopeState, SignedFields};
pub use error::{EnvelopeError, Result};
pub use keys::{KeyProvider, StaticKeyProvider};
pub use suite::{CipherAlgorithm, SignatureAlgorithm};
pub use wire_error::ErrorCode;
