//! Fuzz target for Envelope::from_bytes.
//!
//! Decoding arbitrary bytes must never panic, and anything that decodes
//! must re-encode to the same bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use secretly_envelope::Envelope;

fuzz_target!(|data: &[u8]| {
    let Ok(envelope) = Envelope::from_bytes(data) else {
        return;
    };

    // Validation and hashing reject or succeed, never panic
    let _ = envelope.validate();
    let _ = envelope.content_hash();

    // The wire form is canonical
    let bytes = envelope.to_bytes().unwrap();
    assert_eq!(bytes.as_slice(), data);
});
