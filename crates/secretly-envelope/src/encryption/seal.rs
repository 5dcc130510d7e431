//! One-call sealing and opening.
//!
//! These wrap the [`Envelope`] lifecycle for the common case: seal and
//! sign in one step on the way out, decode and validate and decrypt in one
//! step on the way in. Opening validates immediately; an
//! [`OpenedEnvelope`] only exists for content that passed every check the
//! [`OpenConfig`] asks for.

use secretly_crypto::{Hash256, PublicKey};
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::OpenConfig;
use crate::envelope::Envelope;
use crate::keys::KeyProvider;
use crate::{EnvelopeError, Result};

/// Content recovered from a received envelope.
pub struct OpenedEnvelope {
    /// Recovered signer, `None` only when unsigned envelopes are allowed.
    pub sender: Option<PublicKey>,
    /// Content hash of the envelope that was opened.
    pub content_hash: Hash256,
    /// Decrypted content, zeroized on drop.
    pub plaintext: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for OpenedEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenedEnvelope")
            .field("sender", &self.sender)
            .field("content_hash", &self.content_hash)
            .field("plaintext_len", &self.plaintext.len())
            .finish()
    }
}

/// Seal `content` to `recipient`, signing with the provider's key if any.
///
/// # Arguments
///
/// * `content` - The message to protect
/// * `recipient` - Public key of the only party able to open it
/// * `keys` - Source of the sender's signing key
///
/// # Returns
///
/// The serialized envelope.
pub fn seal(content: &[u8], recipient: &PublicKey, keys: &impl KeyProvider) -> Result<Vec<u8>> {
    // Step 1: Encrypt content and wrap the one-time key
    let mut envelope = Envelope::create(content, recipient)?;

    // Step 2: Sign (or not) and serialize
    let signing_key = keys.signing_key()?;
    if signing_key.is_none() {
        debug!("sealing unsigned envelope");
    }
    envelope.serialize_signed(signing_key.as_ref())
}

/// Decode, validate and decrypt an envelope.
///
/// # Arguments
///
/// * `bytes` - The serialized envelope
/// * `keys` - Source of the recipient's decryption key
/// * `config` - Size limit and sender policy
///
/// # Errors
///
/// Any [`EnvelopeError`]; the first failing check decides which.
pub fn open(bytes: &[u8], keys: &impl KeyProvider, config: &OpenConfig) -> Result<OpenedEnvelope> {
    config.validate()?;

    // Step 1: Structural decode under the configured size limit
    let envelope = Envelope::from_bytes_with_limit(bytes, config.max_envelope_size)?;

    // Step 2: Validate header and signature
    let sender = if envelope.is_signed() || config.require_signature {
        envelope.validate()?;
        Some(envelope.sender()?)
    } else {
        envelope.check_header()?;
        None
    };

    // Step 3: Sender policy
    if let Some(expected) = &config.expected_sender {
        if sender.as_ref() != Some(expected) {
            debug!(expected = ?expected, "sender does not match policy");
            return Err(EnvelopeError::SignatureVerificationFailed);
        }
    }

    // Step 4: Decrypt and authenticate
    let recipient = keys.decryption_key()?;
    let plaintext = envelope.decrypt(&recipient)?;

    Ok(OpenedEnvelope {
        sender,
        content_hash: envelope.content_hash(),
        plaintext,
    })
}
