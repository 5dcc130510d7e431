//! Fuzz target for the full open path.
//!
//! Runs decode, validation, sender recovery and decryption with a fixed
//! recipient key over arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use secretly_crypto::PrivateKey;
use secretly_envelope::{open, OpenConfig, StaticKeyProvider};

const RECIPIENT: [u8; 32] = [0x42; 32];

fuzz_target!(|data: &[u8]| {
    let recipient = PrivateKey::from_bytes(&RECIPIENT).unwrap();
    let keys = StaticKeyProvider::new().with_decryption_key(recipient);

    for config in [OpenConfig::default(), OpenConfig::builder().allow_unsigned().build()] {
        // Random input essentially never authenticates
        let _ = open(data, &keys, &config);
    }
});
