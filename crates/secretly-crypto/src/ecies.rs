//! ECIES over secp256k1 for wrapping short secrets.
//!
//! Follows the widely deployed Ethereum (`go-ethereum/crypto/ecies`)
//! parameter set for AES-128:
//!
//! 1. Fresh ephemeral key `r`, shared secret `Z = x(r * P)`
//! 2. `K = ConcatKDF-SHA256(Z)` truncated to 32 bytes
//! 3. `Ke = K[..16]`, `Km = SHA256(K[16..])`
//! 4. `c = AES-128-CTR(Ke, iv, m)` with a random `iv`
//! 5. `tag = HMAC-SHA256(Km, iv || c)`
//!
//! Output layout: `R (65, uncompressed) || iv (16) || c || tag (32)`.
//!
//! ## Security Notes
//!
//! - Every unwrap failure collapses to [`CryptoError::Decryption`]
//! - The tag is checked in constant time before decrypting
//! - Derived keys are zeroized after use

use hmac::{Hmac, Mac};
use k256::ecdh::diffie_hellman;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::secp256k1::{PrivateKey, PublicKey, PUBLIC_KEY_SIZE, UNCOMPRESSED_TAG};
use crate::symmetric::{self, Iv, SymmetricKey, IV_SIZE, KEY_SIZE};
use crate::{CryptoError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Size of the HMAC-SHA256 tag in bytes.
pub const TAG_SIZE: usize = 32;

/// Bytes added to the wrapped secret: ephemeral key, IV and tag.
pub const OVERHEAD: usize = PUBLIC_KEY_SIZE + IV_SIZE + TAG_SIZE;

/// Encrypt `secret` so only the holder of `recipient`'s private key can
/// recover it.
///
/// # Errors
///
/// Returns [`CryptoError::Encryption`] if key derivation fails.
pub fn wrap(recipient: &PublicKey, secret: &[u8]) -> Result<Vec<u8>> {
    wrap_with(&PrivateKey::generate(), &Iv::generate(), recipient, secret)
}

/// Deterministic core of [`wrap`] with caller-chosen ephemeral key and IV.
fn wrap_with(
    ephemeral: &PrivateKey,
    iv: &Iv,
    recipient: &PublicKey,
    secret: &[u8],
) -> Result<Vec<u8>> {
    let (ke, km) = derive_keys(ephemeral, recipient)
        .map_err(|_| CryptoError::Encryption("key derivation failed".to_string()))?;

    let ciphertext = symmetric::apply_keystream(&ke, iv, secret);
    let tag = message_tag(&km, iv.as_bytes(), &ciphertext)
        .map_err(|_| CryptoError::Encryption("mac init failed".to_string()))?;

    let mut out = Vec::with_capacity(OVERHEAD + secret.len());
    out.extend_from_slice(&ephemeral.public_key().to_bytes());
    out.extend_from_slice(iv.as_bytes());
    out.extend_from_slice(&ciphertext);
    out.extend_from_slice(&tag);
    Ok(out)
}

/// Recover a secret wrapped with [`wrap`].
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] for any malformed input, wrong key
/// or failed tag check.
pub fn unwrap(recipient: &PrivateKey, wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if wrapped.len() < OVERHEAD || wrapped[0] != UNCOMPRESSED_TAG {
        return Err(CryptoError::Decryption);
    }

    let (ephemeral, rest) = wrapped.split_at(PUBLIC_KEY_SIZE);
    let (iv, rest) = rest.split_at(IV_SIZE);
    let (ciphertext, tag) = rest.split_at(rest.len() - TAG_SIZE);

    let ephemeral = PublicKey::from_bytes(ephemeral).map_err(|_| CryptoError::Decryption)?;
    let (ke, km) = derive_keys(recipient, &ephemeral)?;

    let mut mac = HmacSha256::new_from_slice(km.as_slice()).map_err(|_| CryptoError::Decryption)?;
    mac.update(iv);
    mac.update(ciphertext);
    mac.verify_slice(tag).map_err(|_| CryptoError::Decryption)?;

    let iv = Iv::from_bytes(iv).map_err(|_| CryptoError::Decryption)?;
    Ok(Zeroizing::new(symmetric::apply_keystream(&ke, &iv, ciphertext)))
}

/// ECDH followed by the KDF split into an encryption and a MAC key.
fn derive_keys(
    secret: &PrivateKey,
    peer: &PublicKey,
) -> Result<(SymmetricKey, Zeroizing<[u8; 32]>)> {
    let shared = diffie_hellman(
        secret.signing_key().as_nonzero_scalar(),
        peer.verifying_key().as_affine(),
    );
    let k = concat_kdf(shared.raw_secret_bytes().as_slice(), 2 * KEY_SIZE);

    let ke = SymmetricKey::from_bytes(&k[..KEY_SIZE]).map_err(|_| CryptoError::Decryption)?;
    let km: [u8; 32] = Sha256::digest(&k[KEY_SIZE..]).into();
    Ok((ke, Zeroizing::new(km)))
}

/// NIST SP 800-56A concatenation KDF with SHA-256 and empty shared info.
fn concat_kdf(z: &[u8], len: usize) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(len + 32));
    let mut counter: u32 = 1;
    while out.len() < len {
        let mut hasher = Sha256::new();
        hasher.update(counter.to_be_bytes());
        hasher.update(z);
        out.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    out.truncate(len);
    out
}

fn message_tag(km: &[u8; 32], iv: &[u8], ciphertext: &[u8]) -> Result<[u8; TAG_SIZE]> {
    let mut mac = HmacSha256::new_from_slice(km).map_err(|_| CryptoError::Decryption)?;
    mac.update(iv);
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().into())
}
