//! Fuzz target for Hash256 parsing.
//!
//! Arbitrary bytes and hex strings must parse or fail cleanly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use secretly_crypto::Hash256;

fuzz_target!(|data: &[u8]| {
    // Exactly 32 bytes succeed, anything else fails
    match Hash256::from_bytes(data) {
        Ok(hash) => {
            assert_eq!(data.len(), Hash256::SIZE);
            let parsed = Hash256::from_hex(&hash.to_hex()).unwrap();
            assert_eq!(hash, parsed);
            assert!(hash.ct_eq_slice(data));
        }
        Err(_) => assert_ne!(data.len(), Hash256::SIZE),
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Hash256::from_hex(text);
    }
});
