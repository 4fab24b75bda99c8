//! PII encryption and hash indexes.
//!
//! Every PII field is stored as two columns: an AES-128-GCM ciphertext
//! (`base64(nonce || ciphertext || tag)`) and a SHA-256 hex digest of the
//! normalized value used for equality search. Equality lookups never decrypt.
//!
//! One `EncryptionService` is built at startup from `ENCRYPTION_KEY` and shared
//! through `AppState`; the expanded key is zeroized when the service drops.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes128Gcm, Key, Nonce};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

const KEY_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid encryption key: {0}")]
    InvalidKey(String),

    /// Tampered, truncated or foreign-key ciphertext. Never retried.
    #[error("ciphertext failed integrity check")]
    IntegrityFault,
}

pub struct EncryptionService {
    cipher: Aes128Gcm,
    ephemeral: bool,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService")
            .field("ephemeral", &self.ephemeral)
            .finish_non_exhaustive()
    }
}

impl EncryptionService {
    /// Builds the service from a base64 key. `None` generates an ephemeral key
    /// and logs a warning; whether that is acceptable is the caller's call.
    pub fn from_config(key_b64: Option<&str>) -> Result<Self, CryptoError> {
        match key_b64.map(str::trim).filter(|k| !k.is_empty()) {
            Some(encoded) => {
                let raw = Zeroizing::new(
                    BASE64_STANDARD
                        .decode(encoded)
                        .map_err(|e| CryptoError::InvalidKey(format!("not base64: {e}")))?,
                );
                if raw.len() != KEY_LEN {
                    return Err(CryptoError::InvalidKey(format!(
                        "expected {KEY_LEN} bytes, got {}",
                        raw.len()
                    )));
                }
                let key = Key::<Aes128Gcm>::from_slice(raw.as_slice());
                Ok(Self {
                    cipher: Aes128Gcm::new(key),
                    ephemeral: false,
                })
            }
            None => {
                warn!(
                    "ENCRYPTION_KEY not set; generated an ephemeral key. \
                     Data encrypted now cannot be decrypted after restart."
                );
                let key = Aes128Gcm::generate_key(OsRng);
                Ok(Self {
                    cipher: Aes128Gcm::new(&key),
                    ephemeral: true,
                })
            }
        }
    }

    /// Generates a fresh base64 key suitable for `ENCRYPTION_KEY`.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn generate_key_b64() -> String {
        let key = Aes128Gcm::generate_key(OsRng);
        BASE64_STANDARD.encode(key)
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Encrypts with a random nonce per call; equal plaintexts give different outputs.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let nonce = Aes128Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::IntegrityFault)?;

        let mut framed = Vec::with_capacity(NONCE_LEN + sealed.len());
        framed.extend_from_slice(&nonce);
        framed.extend_from_slice(&sealed);
        Ok(BASE64_STANDARD.encode(framed))
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let framed = BASE64_STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| CryptoError::IntegrityFault)?;
        if framed.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::IntegrityFault);
        }

        let (nonce, sealed) = framed.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CryptoError::IntegrityFault)?;
        String::from_utf8(plain).map_err(|_| CryptoError::IntegrityFault)
    }

    /// Shallow copy of `record` with each listed, non-empty string field encrypted.
    pub fn encrypt_dict(
        &self,
        record: &Map<String, Value>,
        fields: &[&str],
    ) -> Result<Map<String, Value>, CryptoError> {
        self.map_fields(record, fields, |v| self.encrypt(v))
    }

    /// Inverse of [`encrypt_dict`](Self::encrypt_dict).
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn decrypt_dict(
        &self,
        record: &Map<String, Value>,
        fields: &[&str],
    ) -> Result<Map<String, Value>, CryptoError> {
        self.map_fields(record, fields, |v| self.decrypt(v))
    }

    fn map_fields<F>(
        &self,
        record: &Map<String, Value>,
        fields: &[&str],
        apply: F,
    ) -> Result<Map<String, Value>, CryptoError>
    where
        F: Fn(&str) -> Result<String, CryptoError>,
    {
        let mut out = record.clone();
        for field in fields {
            if let Some(Value::String(s)) = record.get(*field) {
                if !s.is_empty() {
                    out.insert((*field).to_string(), Value::String(apply(s)?));
                }
            }
        }
        Ok(out)
    }
}

/// SHA-256 hex of the trimmed, lowercased email. Equality index over ciphertexts.
pub fn hash_email(email: &str) -> String {
    sha256_hex(email.trim().to_lowercase().as_bytes())
}

/// SHA-256 hex of the digits of `phone`, so `+52 (55) 1234-5678` and
/// `525512345678` index the same row.
pub fn hash_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    sha256_hex(digits.as_bytes())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
