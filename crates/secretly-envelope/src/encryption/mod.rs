//! Hybrid encryption of envelope content.
//!
//! This module ties together:
//! - One-time AES-128-CTR keys for the payload
//! - ECIES over secp256k1 to wrap the one-time key to the recipient
//! - Recoverable secp256k1 signatures identifying the sender
//!
//! ## Usage
//!
//! ### Sealing
//!
//! ```
//! use secretly_crypto::PrivateKey;
//! use secretly_envelope::encryption::seal;
//! use secretly_envelope::keys::StaticKeyProvider;
//!
//! let sender = PrivateKey::generate();
//! let recipient = PrivateKey::generate();
//!
//! let keys = StaticKeyProvider::new().with_signing_key(sender);
//! let bytes = seal(b"Hello!", &recipient.public_key(), &keys).unwrap();
//! // Send `bytes` over any transport
//! ```
//!
//! ### Opening
//!
//! ```ignore
//! use secretly_envelope::config::OpenConfig;
//! use secretly_envelope::encryption::open;
//!
//! let keys = StaticKeyProvider::new().with_decryption_key(recipient);
//! let opened = open(&bytes, &keys, &OpenConfig::default())?;
//! println!("From: {:?}", opened.sender);
//! ```

pub mod seal;

pub use seal::{open, seal, OpenedEnvelope};
