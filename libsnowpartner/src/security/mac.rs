//! Keyed checksum tags

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use super::kdf::{DerivedKey, KdfError, KeyDerivation};

type HmacSha256 = Hmac<Sha256>;

const CHECKSUM_SALT: &[u8] = b"snow-partner-license-v1";

/// MAC errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacError {
    /// No secret material
    #[error("checksum secret must not be empty")]
    EmptySecret,

    /// HMAC refused the key
    #[error("invalid checksum key")]
    InvalidKey,

    /// Key derivation failed
    #[error("key derivation error: {0}")]
    Kdf(#[from] KdfError),
}

/// HMAC-SHA256 key for license checksums
#[derive(Clone)]
pub struct ChecksumKey {
    key: DerivedKey,
}

impl ChecksumKey {
    /// Derive from a shared secret
    pub fn from_secret(secret: &[u8]) -> Result<Self, MacError> {
        if secret.is_empty() {
            return Err(MacError::EmptySecret);
        }
        let kdf = KeyDerivation::new(secret, Some(CHECKSUM_SALT));
        Ok(Self {
            key: kdf.derive_checksum_key()?,
        })
    }

    /// First 8 bytes of HMAC-SHA256 over `data`, big-endian
    pub fn tag(&self, data: &[u8]) -> Result<u64, MacError> {
        let mut mac =
            HmacSha256::new_from_slice(self.key.as_bytes()).map_err(|_| MacError::InvalidKey)?;
        mac.update(data);
        let digest = mac.finalize().into_bytes();

        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Ok(u64::from_be_bytes(head))
    }
}

impl fmt::Debug for ChecksumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChecksumKey(..)")
    }
}
