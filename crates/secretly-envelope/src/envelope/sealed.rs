//! The sealed envelope and its lifecycle.
//!
//! ```text
//! create ──► Unsigned ──sign──► Signed ──to_bytes──► blob
//!                                                     │
//! blob ──from_bytes──► Received ──validate──► Valid ──┴─► sender / decrypt (cached)
//! ```
//!
//! Decoding never performs cryptographic checks; `validate()` does, in a
//! fixed order, and the first failing check decides the error.
//!
//! An `Envelope` is not internally synchronized. Derived values (sender,
//! plaintext) are memoized per instance.

use std::cell::{Cell, OnceCell};

use secretly_crypto::{
    ecies, recover_public_key, sign, symmetric, Hash256, Iv, PrivateKey, PublicKey,
    RecoverableSignature, SymmetricKey,
};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::canonical::SignedFields;
use super::wire::{self, WireEnvelopeRef};
use crate::limits::{DEFAULT_MAX_ENVELOPE_SIZE, ENVELOPE_VERSION, SYMMETRIC_KEY_SIZE};
use crate::suite::{CipherAlgorithm, SignatureAlgorithm};
use crate::{EnvelopeError, Result};

/// The only `(signature, cipher)` pair version 1 accepts.
pub const PINNED_SUITE: (SignatureAlgorithm, CipherAlgorithm) =
    (SignatureAlgorithm::Secp256k1, CipherAlgorithm::Aes128Ctr);

/// Where an envelope value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    Created,
    Decoded,
}

/// Observable lifecycle state of an [`Envelope`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Built locally, no signature yet.
    Unsigned,
    /// Signed locally, including a decoded envelope that was re-signed.
    Signed,
    /// Decoded from bytes, not yet validated.
    Received,
    /// Passed [`Envelope::validate`].
    Valid,
}

/// A sealed message addressed to one recipient.
///
/// The sender is never stored in clear; it is recovered from the
/// signature over [`Envelope::content_hash`].
#[derive(Clone)]
pub struct Envelope {
    version: u8,
    signature_algorithm: SignatureAlgorithm,
    cipher_algorithm: CipherAlgorithm,
    payload: Vec<u8>,
    wrapped_key: Vec<u8>,
    iv: Vec<u8>,
    mac: Vec<u8>,
    signature: Option<Vec<u8>>,

    origin: Origin,
    validated: Cell<bool>,
    sender: OnceCell<PublicKey>,
    /// Plaintext together with the recipient it was opened for.
    plaintext: OnceCell<(PublicKey, Zeroizing<Vec<u8>>)>,
}

impl Envelope {
    /// Seal `content` to `recipient`.
    ///
    /// A fresh one-time key and IV are drawn for every call. The envelope
    /// is not signed; see [`Envelope::sign`] and
    /// [`Envelope::serialize_signed`].
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::DecryptionFailed`] if key wrapping fails.
    pub fn create(content: &[u8], recipient: &PublicKey) -> Result<Self> {
        let key = SymmetricKey::generate();
        let iv = Iv::generate();

        let payload = symmetric::apply_keystream(&key, &iv, content);
        let wrapped_key = ecies::wrap(recipient, key.as_bytes())?;
        let mac = Hash256::hash_concat(&[content, key.as_bytes()]);

        trace!(
            payload_len = payload.len(),
            wrapped_key_len = wrapped_key.len(),
            "created envelope"
        );

        Ok(Self {
            version: ENVELOPE_VERSION,
            signature_algorithm: PINNED_SUITE.0,
            cipher_algorithm: PINNED_SUITE.1,
            payload,
            wrapped_key,
            iv: iv.as_bytes().to_vec(),
            mac: mac.to_bytes().to_vec(),
            signature: None,
            origin: Origin::Created,
            validated: Cell::new(false),
            sender: OnceCell::new(),
            plaintext: OnceCell::new(),
        })
    }

    // ==================== Accessors ====================

    /// Protocol version as found on the wire.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Signature algorithm.
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.signature_algorithm
    }

    /// Payload cipher.
    pub fn cipher_algorithm(&self) -> CipherAlgorithm {
        self.cipher_algorithm
    }

    /// Encrypted content.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// One-time key wrapped to the recipient.
    pub fn wrapped_key(&self) -> &[u8] {
        &self.wrapped_key
    }

    /// Payload IV.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// MAC over plaintext and one-time key.
    pub fn mac(&self) -> &[u8] {
        &self.mac
    }

    /// Raw signature bytes, if signed.
    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    /// Whether a signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EnvelopeState {
        if self.validated.get() {
            return EnvelopeState::Valid;
        }
        match (self.origin, self.is_signed()) {
            (Origin::Created, false) => EnvelopeState::Unsigned,
            (Origin::Created, true) => EnvelopeState::Signed,
            (Origin::Decoded, _) => EnvelopeState::Received,
        }
    }

    /// Borrowed view of the signed field set.
    pub fn signed_fields(&self) -> SignedFields<'_> {
        SignedFields {
            version: self.version,
            signature_algorithm: self.signature_algorithm,
            cipher_algorithm: self.cipher_algorithm,
            payload: &self.payload,
            wrapped_key: &self.wrapped_key,
            iv: &self.iv,
            mac: &self.mac,
        }
    }

    /// Hash of the canonical encoding; the value that gets signed.
    pub fn content_hash(&self) -> Hash256 {
        self.signed_fields().content_hash()
    }

    // ==================== Signing & Encoding ====================

    /// Sign the content hash with the sender's key.
    ///
    /// Signing is deterministic, so signing unchanged fields with the same
    /// key always yields the same signature.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::SignatureVerificationFailed`] if the
    /// signing backend fails.
    pub fn sign(&mut self, sender: &PrivateKey) -> Result<()> {
        let hash = self.content_hash();
        let signature = sign(&hash, sender)?;

        self.signature = Some(signature.to_vec());
        self.origin = Origin::Created;
        self.sender = OnceCell::new();
        self.validated.set(false);

        debug!(content_hash = %hash, "signed envelope");
        Ok(())
    }

    /// Optionally sign, then serialize.
    ///
    /// With `None` the current signature (if any) is kept as is; a never
    /// signed envelope produces the unsigned wire form.
    pub fn serialize_signed(&mut self, sender: Option<&PrivateKey>) -> Result<Vec<u8>> {
        if let Some(key) = sender {
            self.sign(key)?;
        }
        self.to_bytes()
    }

    /// Serialize to the wire format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wire::encode(&WireEnvelopeRef {
            version: self.version,
            signature_algorithm: self.signature_algorithm.as_str(),
            cipher_algorithm: self.cipher_algorithm.as_str(),
            payload: &self.payload,
            wrapped_key: &self.wrapped_key,
            iv: &self.iv,
            mac: &self.mac,
            signature: self.signature.as_deref().unwrap_or_default(),
        })
    }

    /// Decode with the default size limit.
    ///
    /// # Errors
    ///
    /// See [`Envelope::from_bytes_with_limit`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with_limit(bytes, DEFAULT_MAX_ENVELOPE_SIZE)
    }

    /// Structural decode. No cryptographic checks are performed.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::MalformedEnvelope`] for oversize, truncated or
    ///   trailing input
    /// - [`EnvelopeError::UnsupportedAlgorithm`] for an unknown signature
    ///   or cipher identifier
    pub fn from_bytes_with_limit(bytes: &[u8], max_size: usize) -> Result<Self> {
        let decoded = wire::decode(bytes, max_size)?;

        let signature_algorithm = decoded.signature_algorithm.parse::<SignatureAlgorithm>()?;
        let cipher_algorithm = decoded.cipher_algorithm.parse::<CipherAlgorithm>()?;
        let signature = (!decoded.signature.is_empty()).then_some(decoded.signature);

        trace!(
            version = decoded.version,
            payload_len = decoded.payload.len(),
            signed = signature.is_some(),
            "decoded envelope"
        );

        Ok(Self {
            version: decoded.version,
            signature_algorithm,
            cipher_algorithm,
            payload: decoded.payload,
            wrapped_key: decoded.wrapped_key,
            iv: decoded.iv,
            mac: decoded.mac,
            signature,
            origin: Origin::Decoded,
            validated: Cell::new(false),
            sender: OnceCell::new(),
            plaintext: OnceCell::new(),
        })
    }

    // ==================== Validation ====================

    /// Check version and algorithm suite only.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::UnsupportedVersion`] or
    /// [`EnvelopeError::UnsupportedAlgorithm`].
    pub fn check_header(&self) -> Result<()> {
        if self.version != ENVELOPE_VERSION {
            debug!(version = self.version, "rejected envelope version");
            return Err(EnvelopeError::UnsupportedVersion {
                expected: ENVELOPE_VERSION,
                actual: self.version,
            });
        }
        if self.signature_algorithm != PINNED_SUITE.0 {
            return Err(EnvelopeError::UnsupportedAlgorithm(format!(
                "signature algorithm {}",
                self.signature_algorithm
            )));
        }
        if self.cipher_algorithm != PINNED_SUITE.1 {
            return Err(EnvelopeError::UnsupportedAlgorithm(format!(
                "cipher {}",
                self.cipher_algorithm
            )));
        }
        Ok(())
    }

    /// Full validation: version, suite, then signature.
    ///
    /// Checks short-circuit in that order. On success the recovered sender
    /// is cached and the envelope moves to [`EnvelopeState::Valid`].
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::UnsupportedVersion`]
    /// - [`EnvelopeError::UnsupportedAlgorithm`]
    /// - [`EnvelopeError::InvalidSignature`] when absent or malformed
    /// - [`EnvelopeError::SignatureVerificationFailed`] when no valid
    ///   signer can be recovered
    pub fn validate(&self) -> Result<()> {
        self.check_header()?;
        let sender = self.sender()?;
        self.validated.set(true);
        debug!(sender = ?sender, "validated envelope");
        Ok(())
    }

    /// The public key that signed this envelope.
    ///
    /// Recovered on first call and cached.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidSignature`] if unsigned or
    /// malformed, [`EnvelopeError::SignatureVerificationFailed`] if
    /// recovery fails.
    pub fn sender(&self) -> Result<PublicKey> {
        if let Some(sender) = self.sender.get() {
            return Ok(sender.clone());
        }

        let raw = self
            .signature
            .as_deref()
            .ok_or_else(|| EnvelopeError::InvalidSignature("envelope is unsigned".into()))?;
        let signature = RecoverableSignature::from_bytes(raw).map_err(|e| {
            debug!(error = %e, "rejected envelope signature");
            EnvelopeError::from(e)
        })?;

        let recovered = recover_public_key(&self.content_hash(), &signature).map_err(|_| {
            debug!("signature does not match content hash");
            EnvelopeError::SignatureVerificationFailed
        })?;
        trace!(sender = %recovered, "recovered envelope sender");

        Ok(self.sender.get_or_init(|| recovered).clone())
    }

    /// Check the recovered sender against one known out-of-band.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::SignatureVerificationFailed`] on mismatch,
    /// or any error from [`Envelope::sender`].
    pub fn verify_sender(&self, expected: &PublicKey) -> Result<()> {
        if &self.sender()? != expected {
            debug!(expected = ?expected, "sender mismatch");
            return Err(EnvelopeError::SignatureVerificationFailed);
        }
        Ok(())
    }

    // ==================== Decryption ====================

    /// Recover the plaintext with the recipient's private key.
    ///
    /// The MAC is checked before anything is returned; on mismatch the
    /// plaintext is dropped. The result is cached for this recipient.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::InvalidKeyMaterial`] for a malformed IV
    /// - [`EnvelopeError::DecryptionFailed`] if the key cannot be unwrapped
    /// - [`EnvelopeError::AuthenticationFailed`] on MAC mismatch
    pub fn decrypt(&self, recipient: &PrivateKey) -> Result<Zeroizing<Vec<u8>>> {
        let recipient_public = recipient.public_key();
        if let Some((owner, plaintext)) = self.plaintext.get() {
            if *owner == recipient_public {
                return Ok(plaintext.clone());
            }
        }

        let iv = Iv::from_bytes(&self.iv)?;
        let raw_key = ecies::unwrap(recipient, &self.wrapped_key)
            .map_err(|_| EnvelopeError::DecryptionFailed)?;
        if raw_key.len() != SYMMETRIC_KEY_SIZE {
            return Err(EnvelopeError::DecryptionFailed);
        }
        let key = SymmetricKey::from_bytes(&raw_key)?;

        let plaintext = Zeroizing::new(symmetric::apply_keystream(&key, &iv, &self.payload));
        let mac = Hash256::hash_concat(&[plaintext.as_slice(), key.as_bytes()]);
        if !mac.ct_eq_slice(&self.mac) {
            debug!("envelope mac mismatch");
            return Err(EnvelopeError::AuthenticationFailed);
        }

        // A cache already holding another recipient's plaintext is left alone.
        let _ = self.plaintext.set((recipient_public, plaintext.clone()));
        Ok(plaintext)
    }
}

impl PartialEq for Envelope {
    /// Field-for-field comparison of the wire content. Caches and
    /// lifecycle state are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.signature_algorithm == other.signature_algorithm
            && self.cipher_algorithm == other.cipher_algorithm
            && self.payload == other.payload
            && self.wrapped_key == other.wrapped_key
            && self.iv == other.iv
            && self.mac == other.mac
            && self.signature == other.signature
    }
}

impl Eq for Envelope {}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("version", &self.version)
            .field("signature_algorithm", &self.signature_algorithm)
            .field("cipher_algorithm", &self.cipher_algorithm)
            .field("payload_len", &self.payload.len())
            .field("signed", &self.is_signed())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
