//! The envelope format.
//!
//! ## Structure
//!
//! ```text
//! +------------------+
//! | version          | 1
//! | signature alg    | "secp256k1"
//! | cipher alg       | "aes-128-ctr"
//! +------------------+
//! | payload          | AES-128-CTR(content)        ─┐
//! | wrapped_key      | ECIES(recipient, key)        │ signed
//! | iv               | 16 random bytes              │
//! | mac              | Keccak256(content || key)   ─┘
//! +------------------+
//! | signature        | r || s || v over the content hash
//! +------------------+
//! ```
//!
//! No sender field exists; the sender is whoever the signature recovers to.
//!
//! ## Modules
//!
//! - [`canonical`]: The signed field set and its hash
//! - `wire`: Byte-level encoding
//! - [`sealed`]: The `Envelope` type and its lifecycle

pub mod canonical;
pub mod sealed;
pub(crate) mod wire;

pub use canonical::SignedFields;
pub use sealed::{Envelope, EnvelopeState, PINNED_SUITE};
