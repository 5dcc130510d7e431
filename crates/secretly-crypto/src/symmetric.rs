//! AES-128-CTR symmetric encryption.
//!
//! CTR mode is a pure stream cipher: it provides confidentiality only.
//! Callers must authenticate the ciphertext (or the plaintext) separately.
//!
//! ## Security Notes
//!
//! - Keys are zeroized on drop
//! - Keys and IVs are randomly generated using OsRng
//! - NEVER reuse an IV with the same key

use aes::cipher::{KeyIvInit, StreamCipher};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{CryptoError, Result};

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

/// Size of symmetric key in bytes (128 bits).
pub const KEY_SIZE: usize = 16;

/// Size of the initialization vector in bytes (one AES block).
pub const IV_SIZE: usize = 16;

/// A 128-bit AES key.
///
/// The key is automatically zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Generate a new random symmetric key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Create a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 16 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Get the key as a byte slice.
    ///
    /// # Security
    ///
    /// Avoid logging or persisting the returned bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymmetricKey([REDACTED])")
    }
}

/// A 128-bit initial counter block.
#[derive(Clone, PartialEq, Eq)]
pub struct Iv {
    bytes: [u8; IV_SIZE],
}

impl Iv {
    /// Generate a new random IV.
    pub fn generate() -> Self {
        let mut bytes = [0u8; IV_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Create an IV from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 16 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != IV_SIZE {
            return Err(CryptoError::InvalidIvLength {
                expected: IV_SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; IV_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Get the IV as a byte slice.
    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for Iv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Iv({:02x}{:02x}..)", self.bytes[0], self.bytes[1])
    }
}

/// XOR `data` with the AES-128-CTR keystream for `key` and `iv`.
///
/// Encryption and decryption are the same operation. The counter is the
/// full 128-bit block, big-endian.
pub fn apply_keystream(key: &SymmetricKey, iv: &Iv, data: &[u8]) -> Vec<u8> {
    let mut cipher = Aes128Ctr::new(key.as_bytes().into(), iv.as_bytes().into());
    let mut out = data.to_vec();
    cipher.apply_keystream(&mut out);
    out
}

/// Encrypt `plaintext` with raw key and IV bytes.
///
/// # Errors
///
/// Returns an error if the key or IV is not exactly 16 bytes.
pub fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let key = SymmetricKey::from_bytes(key)?;
    let iv = Iv::from_bytes(iv)?;
    Ok(apply_keystream(&key, &iv, plaintext))
}

/// Decrypt `ciphertext` with raw key and IV bytes.
///
/// A wrong key yields garbage, never an error.
///
/// # Errors
///
/// Returns an error if the key or IV is not exactly 16 bytes.
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    encrypt(key, iv, ciphertext)
}
