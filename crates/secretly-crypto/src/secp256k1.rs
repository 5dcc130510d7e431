//! secp256k1 keys and recoverable ECDSA signatures.
//!
//! Signatures are 65 bytes laid out as `r (32) || s (32) || v (1)` where
//! `v` is the recovery id in `{0, 1}`. Only low-S signatures are accepted,
//! which keeps every signature non-malleable.
//!
//! ## Security Notes
//!
//! - Private keys are zeroized on drop (handled by `k256::ecdsa::SigningKey`)
//! - Signing is deterministic (RFC 6979), no RNG is involved
//! - Uses OsRng for key generation

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::scalar::IsHigh;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::hash::Hash256;
use crate::{CryptoError, Result};

/// Size of a private key (scalar) in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of an uncompressed SEC1 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 65;

/// Size of a recoverable signature in bytes.
pub const SIGNATURE_SIZE: usize = 65;

/// Leading byte of an uncompressed SEC1 point.
pub const UNCOMPRESSED_TAG: u8 = 0x04;

/// A secp256k1 private key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key.
    pub fn generate() -> Self {
        Self {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create from a 32-byte big-endian scalar.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not 32 bytes, or is zero or not
    /// below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let inner = SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { inner })
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    ///
    /// Surrounding whitespace is ignored so key files may end in a newline.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = Zeroizing::new(
            hex::decode(s).map_err(|e| CryptoError::InvalidHexFormat(e.to_string()))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Export the scalar as 32 big-endian bytes.
    ///
    /// # Security
    ///
    /// Handle with care - this exposes the private key.
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        Zeroizing::new(self.inner.to_bytes().into())
    }

    /// Get the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: VerifyingKey::from(&self.inner),
        }
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

/// A secp256k1 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parse a SEC1-encoded point (compressed or uncompressed).
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not encode a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { inner })
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHexFormat(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Uncompressed SEC1 encoding: `0x04 || X (32) || Y (32)`.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; PUBLIC_KEY_SIZE];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Lowercase hex of the uncompressed encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(
            f,
            "PublicKey({:02x}{:02x}{:02x}{:02x}..)",
            bytes[1], bytes[2], bytes[3], bytes[4]
        )
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A 65-byte recoverable ECDSA signature, `r || s || v`.
///
/// Construction through [`RecoverableSignature::from_bytes`] guarantees a
/// well-formed, low-S signature with a recovery id of 0 or 1.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    bytes: [u8; SIGNATURE_SIZE],
}

impl RecoverableSignature {
    /// Parse and check a raw signature.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSignature`] for a wrong length, a
    /// recovery id above 1, a zero or out-of-range `r`/`s`, or a high `s`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SIGNATURE_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature("expected 65 bytes"))?;
        let sig = Self { bytes };
        sig.parts()?;
        Ok(sig)
    }

    /// Get the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.bytes
    }

    /// Convert to a byte vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// The recovery id byte `v`.
    pub fn recovery_byte(&self) -> u8 {
        self.bytes[64]
    }

    fn parts(&self) -> Result<(Signature, RecoveryId)> {
        let recid = match self.bytes[64] {
            v @ (0 | 1) => RecoveryId::from_byte(v),
            _ => None,
        }
        .ok_or(CryptoError::InvalidSignature("recovery id out of range"))?;
        let sig = Signature::from_slice(&self.bytes[..64])
            .map_err(|_| CryptoError::InvalidSignature("malformed r or s"))?;
        if bool::from(sig.s().is_high()) {
            return Err(CryptoError::InvalidSignature("high S value"));
        }
        Ok((sig, recid))
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RecoverableSignature({:02x}{:02x}..,v={})",
            self.bytes[0], self.bytes[1], self.bytes[64]
        )
    }
}

/// Sign a 32-byte digest, producing a low-S recoverable signature.
///
/// # Errors
///
/// Returns [`CryptoError::Signing`] if the backend fails.
pub fn sign(hash: &Hash256, key: &PrivateKey) -> Result<RecoverableSignature> {
    let (sig, recid) = key
        .signing_key()
        .sign_prehash_recoverable(hash.as_bytes())
        .map_err(|_| CryptoError::Signing)?;
    // k256 normalizes S while signing; anything else is a backend fault.
    if bool::from(sig.s().is_high()) {
        return Err(CryptoError::Signing);
    }

    let mut bytes = [0u8; SIGNATURE_SIZE];
    bytes[..64].copy_from_slice(&sig.to_bytes());
    bytes[64] = recid.to_byte();
    Ok(RecoverableSignature { bytes })
}

/// Recover the public key that produced `sig` over `hash`.
///
/// The recovered key is checked against the signature before it is
/// returned.
///
/// # Errors
///
/// Returns [`CryptoError::SignatureVerification`] if no key can be
/// recovered or the recovered key does not verify.
pub fn recover_public_key(hash: &Hash256, sig: &RecoverableSignature) -> Result<PublicKey> {
    let (signature, recid) = sig.parts()?;
    let inner = VerifyingKey::recover_from_prehash(hash.as_bytes(), &signature, recid)
        .map_err(|_| CryptoError::SignatureVerification)?;
    inner
        .verify_prehash(hash.as_bytes(), &signature)
        .map_err(|_| CryptoError::SignatureVerification)?;
    Ok(PublicKey { inner })
}

/// Check `sig` over `hash` against a known public key.
pub fn verify(public_key: &PublicKey, hash: &Hash256, sig: &RecoverableSignature) -> bool {
    match sig.parts() {
        Ok((signature, _)) => public_key
            .verifying_key()
            .verify_prehash(hash.as_bytes(), &signature)
            .is_ok(),
        Err(_) => false,
    }
}
