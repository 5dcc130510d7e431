//! Integration tests for secretly-envelope.
//!
//! These tests drive the public API end to end through the wire form:
//! sealing, decoding, validation, sender recovery, decryption, algorithm
//! pinning and the high-level seal/open helpers.

use secretly_crypto::PrivateKey;
use secretly_envelope::limits::{CIPHER_ALGORITHM_ID, ENVELOPE_VERSION, SIGNATURE_ALGORITHM_ID};
use secretly_envelope::{
    open, seal, Envelope, EnvelopeError, EnvelopeState, ErrorCode, OpenConfig, OpenConfigBuilder,
    StaticKeyProvider,
};

/// Replace the first occurrence of `from` in `bytes` with `to` (same length).
fn replace_once(bytes: &mut [u8], from: &[u8], to: &[u8]) {
    assert_eq!(from.len(), to.len());
    let pos = bytes
        .windows(from.len())
        .position(|w| w == from)
        .expect("pattern present");
    bytes[pos..pos + to.len()].copy_from_slice(to);
}

// ============================================================================
// Concrete Scenario
// ============================================================================

mod scenario {
    use super::*;

    #[test]
    fn test_sender_receiver_third_party() {
        let sender = PrivateKey::generate();
        let receiver = PrivateKey::generate();
        let third = PrivateKey::generate();

        let mut envelope = Envelope::create(b"test", &receiver.public_key()).unwrap();
        let blob = envelope.serialize_signed(Some(&sender)).unwrap();

        let received = Envelope::from_bytes(&blob).unwrap();
        assert_eq!(received.state(), EnvelopeState::Received);

        received.validate().unwrap();
        assert_eq!(received.state(), EnvelopeState::Valid);
        assert_eq!(received.sender().unwrap(), sender.public_key());
        assert_eq!(received.decrypt(&receiver).unwrap().as_slice(), b"test");

        let other = Envelope::from_bytes(&blob).unwrap();
        other.validate().unwrap();
        let result = other.decrypt(&third);
        assert!(matches!(
            result,
            Err(EnvelopeError::DecryptionFailed) | Err(EnvelopeError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_sender_and_decrypt_are_idempotent() {
        let sender = PrivateKey::generate();
        let receiver = PrivateKey::generate();
        let mut envelope = Envelope::create(b"again", &receiver.public_key()).unwrap();
        let blob = envelope.serialize_signed(Some(&sender)).unwrap();

        let received = Envelope::from_bytes(&blob).unwrap();
        for _ in 0..3 {
            assert_eq!(received.sender().unwrap(), sender.public_key());
            assert_eq!(received.decrypt(&receiver).unwrap().as_slice(), b"again");
        }
    }

    #[test]
    fn test_content_hash_survives_the_wire() {
        let receiver = PrivateKey::generate();
        let mut envelope = Envelope::create(b"hash me", &receiver.public_key()).unwrap();
        let blob = envelope.serialize_signed(Some(&PrivateKey::generate())).unwrap();

        let received = Envelope::from_bytes(&blob).unwrap();
        assert_eq!(received.content_hash(), envelope.content_hash());
        assert_eq!(received, envelope);
    }
}

// ============================================================================
// Algorithm & Version Pinning
// ============================================================================

mod pinning {
    use super::*;

    fn signed_blob() -> Vec<u8> {
        let receiver = PrivateKey::generate();
        let mut envelope = Envelope::create(b"pinned", &receiver.public_key()).unwrap();
        envelope
            .serialize_signed(Some(&PrivateKey::generate()))
            .unwrap()
    }

    fn decode_and_validate(bytes: &[u8]) -> Result<(), EnvelopeError> {
        Envelope::from_bytes(bytes)?.validate()
    }

    #[test]
    fn test_wire_carries_pinned_identifiers() {
        let blob = signed_blob();
        assert_eq!(blob[0], ENVELOPE_VERSION);
        assert!(blob
            .windows(SIGNATURE_ALGORITHM_ID.len())
            .any(|w| w == SIGNATURE_ALGORITHM_ID.as_bytes()));
        assert!(blob
            .windows(CIPHER_ALGORITHM_ID.len())
            .any(|w| w == CIPHER_ALGORITHM_ID.as_bytes()));
    }

    #[test]
    fn test_other_cipher_rejected() {
        let mut blob = signed_blob();
        replace_once(&mut blob, b"aes-128-ctr", b"aes-256-ctr");
        assert!(matches!(
            decode_and_validate(&blob),
            Err(EnvelopeError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_other_signature_algorithm_rejected() {
        let mut blob = signed_blob();
        replace_once(&mut blob, b"secp256k1", b"secp256r1");
        assert!(matches!(
            decode_and_validate(&blob),
            Err(EnvelopeError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_other_version_rejected() {
        let mut blob = signed_blob();
        blob[0] = 2;

        // Decoding succeeds; validation rejects.
        let envelope = Envelope::from_bytes(&blob).unwrap();
        assert_eq!(envelope.version(), 2);
        assert_eq!(
            envelope.validate(),
            Err(EnvelopeError::UnsupportedVersion {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut blob = signed_blob();
        blob.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            Envelope::from_bytes(&blob),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_truncated_rejected() {
        let blob = signed_blob();
        for cut in [1, 10, 65, blob.len() / 2] {
            assert!(matches!(
                Envelope::from_bytes(&blob[..blob.len() - cut]),
                Err(EnvelopeError::MalformedEnvelope(_))
            ));
        }
    }
}

// ============================================================================
// Tamper Detection
// ============================================================================

mod tampering {
    use super::*;

    #[test]
    fn test_flipped_signature_byte_rejected() {
        let sender = PrivateKey::generate();
        let receiver = PrivateKey::generate();
        let mut envelope = Envelope::create(b"signed", &receiver.public_key()).unwrap();
        let mut blob = envelope.serialize_signed(Some(&sender)).unwrap();

        // r is the first 32 bytes of the trailing 65-byte signature.
        let r_at = blob.len() - 65;
        blob[r_at + 5] ^= 0x01;

        let received = Envelope::from_bytes(&blob).unwrap();
        let outcome = received
            .validate()
            .and_then(|_| received.verify_sender(&sender.public_key()));
        assert!(outcome.is_err());
    }

    #[test]
    fn test_unsigned_envelope_fails_validation() {
        let receiver = PrivateKey::generate();
        let mut envelope = Envelope::create(b"anon", &receiver.public_key()).unwrap();
        let blob = envelope.serialize_signed(None).unwrap();

        let received = Envelope::from_bytes(&blob).unwrap();
        let err = received.validate().unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidSignature(_)));
        assert_eq!(err.code(), ErrorCode::InvalidSignature);
    }
}

// ============================================================================
// High-level seal / open
// ============================================================================

mod seal_open {
    use super::*;

    #[test]
    fn test_seal_then_open() {
        let sender = PrivateKey::generate();
        let receiver = PrivateKey::generate();

        let blob = seal(
            b"through the helpers",
            &receiver.public_key(),
            &StaticKeyProvider::new().with_signing_key(sender.clone()),
        )
        .unwrap();

        let config = OpenConfigBuilder::new()
            .with_expected_sender(sender.public_key())
            .build();
        let opened = open(
            &blob,
            &StaticKeyProvider::new().with_decryption_key(receiver),
            &config,
        )
        .unwrap();

        assert_eq!(opened.sender, Some(sender.public_key()));
        assert_eq!(opened.plaintext.as_slice(), b"through the helpers");
        assert_eq!(
            opened.content_hash,
            Envelope::from_bytes(&blob).unwrap().content_hash()
        );
    }

    #[test]
    fn test_open_rejects_version_bump() {
        let sender = PrivateKey::generate();
        let receiver = PrivateKey::generate();
        let mut blob = seal(
            b"v",
            &receiver.public_key(),
            &StaticKeyProvider::for_identity(sender),
        )
        .unwrap();
        blob[0] = 7;

        let err = open(
            &blob,
            &StaticKeyProvider::new().with_decryption_key(receiver),
            &OpenConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedVersion);
        assert!(!err.code().is_retryable());
    }
}
