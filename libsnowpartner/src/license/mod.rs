//! Partner License Module
//!
//! Parsing, generation, validation and summaries for Snow partner keys.
//!
//! # Key Format
//!
//! ```text
//! SNOW-RESELLER-{ORG}-{SEATS}-{YYYYMMDD}-{CHECKSUM}
//! SNOW-SOLUTION-{ORG}-{YYYYMMDD}-{CHECKSUM}
//!
//! ORG: organization, no dashes (uppercased on generation)
//! SEATS: purchased seats, 25 minimum
//! YYYYMMDD: last valid day, years 2020-2100
//! CHECKSUM: 6 uppercase base-36 characters
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use snow_partner::license::{generate_reseller_key, parse, validate};
//!
//! let key = generate_reseller_key("acme", 100, expiry)?;
//! let license = parse(&key)?;
//! assert!(validate(&license).is_valid);
//! ```

mod checksum;
mod expiry;
mod info;
mod key;
mod validate;

pub use key::{
    parse,
    referral_code,
    ExpiryStatus,
    LicenseError,
    LicenseTier,
    ParsedPartnerLicense,
    PartnerType,
    KEY_PREFIX,
    MIN_RESELLER_SEATS,
};

pub use expiry::{decode_expiry, encode_expiry, MAX_EXPIRY_YEAR, MIN_EXPIRY_YEAR};

pub use checksum::{
    checksum,
    generate_reseller_key,
    generate_reseller_key_with,
    generate_solution_key,
    generate_solution_key_with,
    verify_checksum,
    ChecksumScheme,
    CHECKSUM_LEN,
};

pub use validate::{validate, validate_at, ValidationResult};

pub use info::{format_info, format_info_with};
