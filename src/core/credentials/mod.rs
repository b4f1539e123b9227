//! API credential generation
//!
//! A credential is a URL-safe random secret plus a derived fingerprint.
//! The secret is handed out exactly once and stored only as an opaque
//! payload; the fingerprint is the sole indexable identity used for
//! lookup-by-secret.

use crate::utils::error::{KeyforgeError, Result};
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

#[cfg(test)]
mod tests;

/// Display length of issued secrets. Truncation happens after base64
/// encoding so the retained characters keep full entropy density.
pub const SECRET_DISPLAY_LEN: usize = 48;

/// Truncation length of the fingerprint, used identically for write-time
/// labeling and read-time lookup.
pub const FINGERPRINT_LEN: usize = 32;

/// Fingerprint prefix length embedded in record names.
pub const FINGERPRINT_NAME_LEN: usize = 8;

/// Default number of random bytes drawn per secret.
pub const DEFAULT_SECRET_BYTES: usize = 48;

/// A freshly generated secret and its lookup fingerprint.
#[derive(Debug, Clone)]
pub struct Credential {
    /// The secret value, returned to the caller exactly once
    pub secret: String,
    /// Truncated SHA-256 fingerprint of the secret
    pub fingerprint: String,
}

impl Credential {
    /// Fingerprint prefix used in record names.
    pub fn name_prefix(&self) -> &str {
        &self.fingerprint[..FINGERPRINT_NAME_LEN.min(self.fingerprint.len())]
    }
}

/// Generate a new credential from `byte_length` bytes of OS entropy.
///
/// Fails only when the entropy source does; there is no fallback to a
/// weaker generator.
pub fn generate(byte_length: usize) -> Result<Credential> {
    let mut bytes = vec![0u8; byte_length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| KeyforgeError::crypto(format!("entropy source unavailable: {}", e)))?;

    let encoded = general_purpose::URL_SAFE_NO_PAD.encode(&bytes);
    let secret: String = encoded.chars().take(SECRET_DISPLAY_LEN).collect();

    let fingerprint = fingerprint(&secret);
    Ok(Credential {
        secret,
        fingerprint,
    })
}

/// Compute the truncated fingerprint of a presented secret.
pub fn fingerprint(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..FINGERPRINT_LEN].to_string()
}
