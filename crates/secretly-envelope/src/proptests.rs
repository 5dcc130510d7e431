//! Property-based tests for envelope invariants.
//!
//! These tests verify envelope properties hold for arbitrary content:
//!
//! - Decryption returns exactly what was sealed
//! - Decoding a serialized envelope reproduces it field for field
//! - The recovered sender is the signing key
//! - Tampering with encrypted fields is always detected
//! - The wrong recipient never sees the plaintext

use proptest::prelude::*;
use secretly_crypto::PrivateKey;

use crate::envelope::Envelope;
use crate::EnvelopeError;

fn sealed(content: &[u8]) -> (Envelope, Vec<u8>, PrivateKey, PrivateKey) {
    let sender = PrivateKey::generate();
    let recipient = PrivateKey::generate();
    let mut envelope = Envelope::create(content, &recipient.public_key()).unwrap();
    let bytes = envelope.serialize_signed(Some(&sender)).unwrap();
    (envelope, bytes, sender, recipient)
}

// ==================== Round-trip Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Whatever is sealed comes back out for the recipient.
    #[test]
    fn decrypt_returns_content(content in prop::collection::vec(any::<u8>(), 0..2048)) {
        let (_, bytes, _, recipient) = sealed(&content);
        let decoded = Envelope::from_bytes(&bytes).unwrap();
        decoded.validate().unwrap();
        let plaintext = decoded.decrypt(&recipient).unwrap();
        prop_assert_eq!(plaintext.as_slice(), content.as_slice());
    }

    /// Decoding reproduces the envelope and re-encoding is byte-identical.
    #[test]
    fn serialization_roundtrip(content in prop::collection::vec(any::<u8>(), 0..512)) {
        let (original, bytes, sender, _) = sealed(&content);
        let mut decoded = Envelope::from_bytes(&bytes).unwrap();
        prop_assert_eq!(&decoded, &original);
        prop_assert_eq!(decoded.serialize_signed(Some(&sender)).unwrap(), bytes);
    }

    /// The signer is exactly who signing was done with.
    #[test]
    fn sender_is_recovered(content in prop::collection::vec(any::<u8>(), 0..256)) {
        let (_, bytes, sender, _) = sealed(&content);
        let decoded = Envelope::from_bytes(&bytes).unwrap();
        prop_assert_eq!(decoded.sender().unwrap(), sender.public_key());
        prop_assert!(decoded.verify_sender(&sender.public_key()).is_ok());
    }
}

// ==================== Rejection Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// A different private key never yields the plaintext.
    #[test]
    fn wrong_recipient_rejected(content in prop::collection::vec(any::<u8>(), 1..256)) {
        let (_, bytes, _, _) = sealed(&content);
        let decoded = Envelope::from_bytes(&bytes).unwrap();
        let stranger = PrivateKey::generate();
        let rejected = matches!(
            decoded.decrypt(&stranger),
            Err(EnvelopeError::DecryptionFailed) | Err(EnvelopeError::AuthenticationFailed)
        );
        prop_assert!(rejected);
    }

    /// Flipping any bit inside the wire form never lets tampered content
    /// through: either decode, validation, sender match or decryption fails.
    #[test]
    fn wire_tampering_detected(
        content in prop::collection::vec(any::<u8>(), 1..128),
        idx in any::<usize>(),
        bit in 0u8..8,
    ) {
        let (_, mut bytes, sender, recipient) = sealed(&content);
        let idx = idx % bytes.len();
        bytes[idx] ^= 1 << bit;

        let accepted = Envelope::from_bytes(&bytes)
            .and_then(|e| {
                e.validate()?;
                e.verify_sender(&sender.public_key())?;
                e.decrypt(&recipient)
            })
            .is_ok();
        prop_assert!(!accepted);
    }

    /// Arbitrary bytes never panic the decoder.
    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = Envelope::from_bytes(&bytes);
    }
}
