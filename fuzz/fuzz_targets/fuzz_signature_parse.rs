//! Fuzz target for recoverable signature parsing and recovery.
//!
//! Parsed signatures are always canonical, and recovery over arbitrary
//! input either yields a key that verifies or fails cleanly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use secretly_crypto::{recover_public_key, verify, Hash256, RecoverableSignature};

fuzz_target!(|data: &[u8]| {
    let Ok(sig) = RecoverableSignature::from_bytes(data) else {
        return;
    };

    assert!(sig.recovery_byte() <= 1);
    assert_eq!(sig.as_bytes().as_slice(), data);

    let hash = Hash256::hash(data);
    if let Ok(public_key) = recover_public_key(&hash, &sig) {
        assert!(verify(&public_key, &hash, &sig));
    }
});
