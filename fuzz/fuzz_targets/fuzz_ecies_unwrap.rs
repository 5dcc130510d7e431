//! Fuzz target for ECIES key unwrapping.
//!
//! Arbitrary wrapped blobs must be rejected without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use secretly_crypto::{ecies, PrivateKey};

const RECIPIENT: [u8; 32] = [0x17; 32];

fuzz_target!(|data: &[u8]| {
    let recipient = PrivateKey::from_bytes(&RECIPIENT).unwrap();

    // Succeeds only if the tag verifies, which random input cannot forge
    if let Ok(secret) = ecies::unwrap(&recipient, data) {
        assert_eq!(secret.len() + ecies::OVERHEAD, data.len());
    }
});
