//! Caller-owned key sources.
//!
//! Operations that need private keys take a [`KeyProvider`] explicitly.
//! Nothing in this crate keeps keys or passphrases in process-wide state;
//! an application that wants caching owns the cache inside its provider.

use secretly_crypto::PrivateKey;

use crate::Result;

/// Supplies private keys on demand.
///
/// Implementations may load keys lazily (from disk, a hardware token, a
/// prompt). Failures should be reported as
/// [`crate::EnvelopeError::InvalidKeyMaterial`].
pub trait KeyProvider {
    /// Key used to sign outgoing envelopes, or `None` to send unsigned.
    fn signing_key(&self) -> Result<Option<PrivateKey>>;

    /// Key used to open envelopes addressed to us.
    fn decryption_key(&self) -> Result<PrivateKey>;
}

/// In-memory provider holding at most one key of each kind.
#[derive(Clone, Default)]
pub struct StaticKeyProvider {
    signing: Option<PrivateKey>,
    decryption: Option<PrivateKey>,
}

impl StaticKeyProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// One key used both to sign and to open.
    pub fn for_identity(key: PrivateKey) -> Self {
        Self {
            signing: Some(key.clone()),
            decryption: Some(key),
        }
    }

    /// Set the signing key.
    pub fn with_signing_key(mut self, key: PrivateKey) -> Self {
        self.signing = Some(key);
        self
    }

    /// Set the decryption key.
    pub fn with_decryption_key(mut self, key: PrivateKey) -> Self {
        self.decryption = Some(key);
        self
    }
}

impl KeyProvider for StaticKeyProvider {
    fn signing_key(&self) -> Result<Option<PrivateKey>> {
        Ok(self.signing.clone())
    }

    fn decryption_key(&self) -> Result<PrivateKey> {
        self.decryption.clone().ok_or_else(|| {
            crate::EnvelopeError::InvalidKeyMaterial("no decryption key configured".into())
        })
    }
}

impl std::fmt::Debug for StaticKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeyProvider")
            .field("signing", &self.signing.as_ref().map(|k| k.public_key()))
            .field("decryption", &self.decryption.as_ref().map(|k| k.public_key()))
            .finish()
    }
}
