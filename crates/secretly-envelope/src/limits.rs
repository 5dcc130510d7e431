//! Protocol limits and constants.
//!
//! All pinned values for envelope version 1 are defined here.

use secretly_crypto::KEY_SIZE;

// === Protocol ===

/// The only envelope version this implementation produces or accepts.
pub const ENVELOPE_VERSION: u8 = 1;

/// Identifier of the pinned signature algorithm.
pub const SIGNATURE_ALGORITHM_ID: &str = "secp256k1";

/// Identifier of the pinned payload cipher.
pub const CIPHER_ALGORITHM_ID: &str = "aes-128-ctr";

/// Domain tag prefixed to the canonical bytes before hashing.
pub const ENVELOPE_HASH_DOMAIN: &[u8] = b"SECRETLY-v1.ENVELOPE-HASH";

// === Field sizes ===

/// One-time symmetric key size in bytes.
pub const SYMMETRIC_KEY_SIZE: usize = KEY_SIZE;

// === DoS limits ===

/// Default maximum accepted wire size (16 MiB).
pub const DEFAULT_MAX_ENVELOPE_SIZE: usize = 16 * 1024 * 1024;

/// Smallest wire size worth handing to the decoder.
///
/// The version byte plus seven empty length-prefixed fields.
pub const MIN_ENVELOPE_SIZE: usize = 1 + 7 * 8;
