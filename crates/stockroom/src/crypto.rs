//! Authenticated encryption for credentials at rest.
//!
//! Access tokens are stored as versioned envelopes of the form
//! `v1:<base64(nonce || ciphertext || tag)>`. The cipher is AES-256-GCM with a
//! fresh 12-byte random nonce per encryption; the key is the SHA-256 digest of
//! a 32-byte process secret. The version prefix leaves room for key rotation:
//! decryption refuses anything it does not recognize.

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Envelope version written by [`SecretCipher::encrypt`].
pub const ENVELOPE_VERSION: &str = "v1";

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Errors from envelope encryption and decryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The configured secret is not exactly 32 bytes.
    #[error("secret key must be exactly 32 bytes, got {0}")]
    KeyLength(usize),

    /// The stored value is not a `version:payload` envelope.
    #[error("invalid secret envelope")]
    InvalidEnvelope,

    /// The envelope version is not supported by this build.
    #[error("unsupported encryption version: {0}")]
    UnsupportedVersion(String),

    /// The envelope payload is not valid base64.
    #[error("invalid envelope encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Encryption or decryption failed (wrong key, truncated or tampered data).
    #[error("cipher failure")]
    Cipher,

    /// Decrypted bytes are not valid UTF-8.
    #[error("decrypted secret is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// AEAD wrapper around the process-level credential key.
///
/// Cheap to clone; construct once from configuration and hand to the
/// components that need it.
#[derive(Clone)]
pub struct SecretCipher {
    key: [u8; 32],
}

impl std::fmt::Debug for SecretCipher {
    // Never expose key material, even in debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCipher").finish_non_exhaustive()
    }
}

impl SecretCipher {
    /// Derive the AES-256 key from the configured secret.
    ///
    /// The secret must be exactly 32 bytes; startup fails otherwise.
    pub fn new(secret_key: &str) -> Result<Self, CryptoError> {
        if secret_key.len() != 32 {
            return Err(CryptoError::KeyLength(secret_key.len()));
        }
        let key = Sha256::digest(secret_key.as_bytes());
        Ok(Self { key: key.into() })
    }

    /// Encrypt a plaintext into a versioned envelope.
    ///
    /// Empty plaintext maps to an empty envelope so optional fields stay
    /// optional.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Cipher)?;

        let mut body = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        body.extend_from_slice(&nonce);
        body.extend_from_slice(&ciphertext);

        Ok(format!("{ENVELOPE_VERSION}:{}", BASE64.encode(body)))
    }

    /// Decrypt a versioned envelope back to the plaintext.
    ///
    /// Empty envelope maps to empty plaintext. Unknown versions are rejected.
    pub fn decrypt(&self, envelope: &str) -> Result<String, CryptoError> {
        if envelope.is_empty() {
            return Ok(String::new());
        }

        let (version, payload) = envelope
            .split_once(':')
            .ok_or(CryptoError::InvalidEnvelope)?;
        if version != ENVELOPE_VERSION {
            return Err(CryptoError::UnsupportedVersion(version.to_owned()));
        }

        let body = BASE64.decode(payload)?;
        if body.len() < NONCE_LEN {
            return Err(CryptoError::InvalidEnvelope);
        }
        let (nonce, ciphertext) = body.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Cipher)?;

        Ok(String::from_utf8(plaintext)?)
    }
}
