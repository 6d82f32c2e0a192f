//! Snow-Flow Partner Licensing
//!
//! License keys for the Snow-Flow partner program:
//!
//! - **License Keys**: parsing and generation of reseller and solution keys
//! - **Validation**: business-rule checks that report every violation
//! - **Summaries**: pricing, margin and commission overviews
//! - **Security**: optional HMAC checksums under a shared secret
//!
//! # Usage
//!
//! ```rust,ignore
//! use snow_partner::license::{parse, validate, format_info};
//!
//! let license = parse("SNOW-RESELLER-ACME-100-20261231-MUIMFS")?;
//! let result = validate(&license);
//! println!("{}", format_info(&license));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod license;
pub mod security;

pub use config::PartnerConfig;
pub use license::{LicenseError, ParsedPartnerLicense, PartnerType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate a partner license key
///
/// Returns `true` if the key parses and passes every business rule.
pub fn validate_license(key: &str) -> bool {
    license::parse(key)
        .map(|l| license::validate(&l).is_valid)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_validate_license() {
        let expiry = (Local::now() + Duration::days(30)).date_naive();
        let key = license::generate_solution_key("acme", expiry).unwrap();

        assert!(validate_license(&key));
        assert!(!validate_license("SNOW-SOLUTION-ACME-20200101-ABC123"));
        assert!(!validate_license("not a key"));
    }
}
