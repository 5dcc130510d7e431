//! Fuzz target for AES-128-CTR with raw key and IV bytes.
//!
//! Arbitrary key, IV and data lengths must be rejected or processed
//! cleanly. The keystream never changes the data length.

#![no_main]

use libfuzzer_sys::fuzz_target;
use secretly_crypto::symmetric::{decrypt, encrypt};
use secretly_crypto::{CryptoError, IV_SIZE, KEY_SIZE};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First two bytes pick the key and IV lengths, the rest is split off
    let key_len = usize::from(data[0] % 33);
    let iv_len = usize::from(data[1] % 33);
    let rest = &data[2..];
    if rest.len() < key_len + iv_len {
        return;
    }
    let (key, rest) = rest.split_at(key_len);
    let (iv, body) = rest.split_at(iv_len);

    match decrypt(key, iv, body) {
        Ok(plaintext) => {
            assert_eq!(key_len, KEY_SIZE);
            assert_eq!(iv_len, IV_SIZE);
            assert_eq!(plaintext.len(), body.len());

            // Encryption and decryption are the same keystream
            let back = encrypt(key, iv, &plaintext).unwrap();
            assert_eq!(back.as_slice(), body);
        }
        Err(CryptoError::InvalidKeyLength { .. }) => assert_ne!(key_len, KEY_SIZE),
        Err(CryptoError::InvalidIvLength { .. }) => {
            assert_eq!(key_len, KEY_SIZE);
            assert_ne!(iv_len, IV_SIZE);
        }
        Err(e) => panic!("unexpected error: {e}"),
    }
});
