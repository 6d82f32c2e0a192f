//! Key Derivation Functions

use hkdf::Hkdf;
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Info string for the license checksum key
const CHECKSUM_KEY_INFO: &[u8] = b"snow-partner-license-checksum";

/// KDF errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdfError {
    /// Requested output longer than HKDF-SHA256 can produce
    #[error("invalid key length: {0} bytes")]
    InvalidLength(usize),
}

/// Derived key material
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: Vec<u8>,
}

impl DerivedKey {
    /// Create from bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Key derivation with HKDF-SHA256
pub struct KeyDerivation {
    hkdf: Hkdf<Sha256>,
}

impl KeyDerivation {
    /// Create new KDF from input key material
    pub fn new(ikm: &[u8], salt: Option<&[u8]>) -> Self {
        let hkdf = Hkdf::<Sha256>::new(salt, ikm);
        Self { hkdf }
    }

    /// Derive a key with given info string
    pub fn derive(&self, info: &[u8], length: usize) -> Result<DerivedKey, KdfError> {
        let mut okm = vec![0u8; length];
        self.hkdf
            .expand(info, &mut okm)
            .map_err(|_| KdfError::InvalidLength(length))?;
        Ok(DerivedKey::new(okm))
    }

    /// Derive the license checksum key (32 bytes)
    pub fn derive_checksum_key(&self) -> Result<DerivedKey, KdfError> {
        self.derive(CHECKSUM_KEY_INFO, 32)
    }
}
