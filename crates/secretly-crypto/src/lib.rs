//! # secretly-crypto
//!
//! Cryptographic primitives for sealed envelopes.
//!
//! This crate provides the building blocks the envelope format is pinned to:
//! - **secp256k1** recoverable ECDSA signatures
//! - **ECIES** over secp256k1 for wrapping symmetric keys
//! - **AES-128-CTR** for payload encryption
//! - **Keccak-256** for hashing
//!
//! ## Security
//!
//! All secret data uses `zeroize` for secure memory cleanup.
//! All comparisons of secrets use constant-time operations via `subtle`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecies;
pub mod error;
pub mod hash;
pub mod secp256k1;
pub mod symmetric;

#[cfg(test)]
mod proptests;

pub use error::{CryptoError, Result};
pub use hash::Hash256;
pub use secp256k1::{
    recover_public_key, sign, verify, PrivateKey, PublicKey, RecoverableSignature,
    PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SIGNATURE_SIZE, UNCOMPRESSED_TAG,
};
pub use symmetric::{Iv, SymmetricKey, IV_SIZE, KEY_SIZE};
