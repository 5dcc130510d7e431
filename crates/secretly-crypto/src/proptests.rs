//! Property-based tests for cryptographic primitives.
//!
//! These tests use proptest to verify cryptographic properties hold
//! for arbitrary inputs. They focus on:
//!
//! - Inverse properties (keystream, key wrapping, signature recovery)
//! - Consistency properties (same input produces same output)
//! - Error handling properties (invalid inputs are rejected)

use proptest::prelude::*;

use crate::{
    ecies, recover_public_key, sign, symmetric, verify, CryptoError, Hash256, Iv, PrivateKey,
    RecoverableSignature, SymmetricKey, IV_SIZE, KEY_SIZE, SIGNATURE_SIZE,
};

// ==================== Symmetric Encryption Property Tests ====================

proptest! {
    /// Applying the keystream twice returns the original data.
    #[test]
    fn keystream_is_involution(data: Vec<u8>) {
        let key = SymmetricKey::generate();
        let iv = Iv::generate();
        let ct = symmetric::apply_keystream(&key, &iv, &data);
        prop_assert_eq!(ct.len(), data.len());
        prop_assert_eq!(symmetric::apply_keystream(&key, &iv, &ct), data);
    }

    /// A single flipped ciphertext bit flips exactly that plaintext bit.
    #[test]
    fn keystream_is_malleable(
        data in prop::collection::vec(any::<u8>(), 1..200),
        idx in any::<usize>(),
    ) {
        let key = SymmetricKey::generate();
        let iv = Iv::generate();
        let mut ct = symmetric::apply_keystream(&key, &iv, &data);
        let idx = idx % ct.len();
        ct[idx] ^= 0x80;

        let pt = symmetric::apply_keystream(&key, &iv, &ct);
        prop_assert_eq!(pt[idx], data[idx] ^ 0x80);
    }

    /// Keys of the wrong length are rejected.
    #[test]
    fn symmetric_key_invalid_length(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(bytes.len() != KEY_SIZE);
        let is_length_error = matches!(
            SymmetricKey::from_bytes(&bytes),
            Err(CryptoError::InvalidKeyLength { .. })
        );
        prop_assert!(is_length_error);
    }

    /// IVs of the wrong length are rejected.
    #[test]
    fn iv_invalid_length(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(bytes.len() != IV_SIZE);
        prop_assert!(Iv::from_bytes(&bytes).is_err());
    }
}

// ==================== Hash Property Tests ====================

proptest! {
    /// Hashing the same input should always produce the same output.
    #[test]
    fn hash_deterministic(data: Vec<u8>) {
        prop_assert_eq!(Hash256::hash(&data), Hash256::hash(&data));
    }

    /// Different inputs should produce different hashes.
    #[test]
    fn different_inputs_different_hashes(
        data1 in prop::collection::vec(any::<u8>(), 0..500),
        data2 in prop::collection::vec(any::<u8>(), 0..500)
    ) {
        prop_assume!(data1 != data2);
        prop_assert_ne!(Hash256::hash(&data1), Hash256::hash(&data2));
    }

    /// Streaming several inputs equals hashing their concatenation.
    #[test]
    fn hash_concat_matches_concatenation(
        a in prop::collection::vec(any::<u8>(), 0..50),
        b in prop::collection::vec(any::<u8>(), 0..50)
    ) {
        let mut combined = a.clone();
        combined.extend(&b);
        prop_assert_eq!(Hash256::hash_concat(&[&a, &b]), Hash256::hash(&combined));
    }

    /// Hex encoding roundtrips.
    #[test]
    fn hash_hex_roundtrip(data: Vec<u8>) {
        let hash = Hash256::hash(&data);
        prop_assert_eq!(Hash256::from_hex(&hash.to_hex()).unwrap(), hash);
    }
}

// ==================== Signature Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Recovering from a fresh signature yields the signer.
    #[test]
    fn sign_then_recover_yields_signer(data: Vec<u8>) {
        let key = PrivateKey::generate();
        let hash = Hash256::hash(&data);
        let sig = sign(&hash, &key).unwrap();

        prop_assert_eq!(recover_public_key(&hash, &sig).unwrap(), key.public_key());
        prop_assert!(verify(&key.public_key(), &hash, &sig));
    }

    /// Signatures parse back from their bytes unchanged.
    #[test]
    fn signature_bytes_reparse(data: Vec<u8>) {
        let key = PrivateKey::generate();
        let sig = sign(&Hash256::hash(&data), &key).unwrap();
        prop_assert_eq!(RecoverableSignature::from_bytes(sig.as_bytes()).unwrap(), sig);
    }

    /// Arbitrary byte strings never panic the signature parser.
    #[test]
    fn signature_parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..100)) {
        let result = RecoverableSignature::from_bytes(&bytes);
        if bytes.len() != SIGNATURE_SIZE {
            prop_assert!(result.is_err());
        }
    }
}

// ==================== Key Wrapping Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Wrapped secrets unwrap to themselves for the intended recipient.
    #[test]
    fn ecies_roundtrip(secret in prop::collection::vec(any::<u8>(), 0..128)) {
        let recipient = PrivateKey::generate();
        let wrapped = ecies::wrap(&recipient.public_key(), &secret).unwrap();
        let unwrapped = ecies::unwrap(&recipient, &wrapped).unwrap();
        prop_assert_eq!(unwrapped.as_slice(), secret.as_slice());
    }

    /// Any single-byte change to a wrapped secret is detected.
    #[test]
    fn ecies_tamper_detected(idx in any::<usize>(), flip in 1u8..=255) {
        let recipient = PrivateKey::generate();
        let mut wrapped = ecies::wrap(&recipient.public_key(), &[0x42; KEY_SIZE]).unwrap();
        let idx = idx % wrapped.len();
        wrapped[idx] ^= flip;

        let is_decryption_error = matches!(
            ecies::unwrap(&recipient, &wrapped),
            Err(CryptoError::Decryption)
        );
        prop_assert!(is_decryption_error);
    }
}
