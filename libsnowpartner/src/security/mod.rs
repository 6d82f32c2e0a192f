//! Security Module
//!
//! Keyed checksums for partner license keys.
//!
//! # Algorithms
//!
//! - **Key Derivation**: HKDF-SHA256 from a shared secret
//! - **Authentication**: HMAC-SHA256, truncated to 64 bits
//!
//! # Usage
//!
//! ```rust,ignore
//! use snow_partner::license::{generate_solution_key_with, ChecksumScheme};
//! use snow_partner::security::ChecksumKey;
//!
//! let key = ChecksumKey::from_secret(b"partner-program-secret")?;
//! let scheme = ChecksumScheme::Keyed(key);
//! let license = generate_solution_key_with(&scheme, "acme", expiry)?;
//! ```

mod kdf;
mod mac;

pub use kdf::{
    DerivedKey,
    KdfError,
    KeyDerivation,
};

pub use mac::{
    ChecksumKey,
    MacError,
};
