//! Checksum generation, key generation and explicit verification

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::expiry::{encode_expiry, ensure_encodable};
use super::key::{
    LicenseError, ParsedPartnerLicense, PartnerType, KEY_PREFIX, MIN_RESELLER_SEATS,
};
use crate::security::ChecksumKey;

/// Checksum length in characters
pub const CHECKSUM_LEN: usize = 6;

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 36^6, the number of distinct checksums
const CHECKSUM_SPACE: u64 = 2_176_782_336;

/// How the checksum field of a key is derived
#[derive(Debug, Clone, Default)]
pub enum ChecksumScheme {
    /// Unkeyed 32-bit rolling hash. Typo guard only.
    #[default]
    Rolling,
    /// HMAC-SHA256 under a secret-derived key
    Keyed(ChecksumKey),
}

impl ChecksumScheme {
    /// Compute the checksum for the given key fields
    pub fn compute(
        &self,
        organization: &str,
        expiry: &str,
        seats: Option<&str>,
    ) -> Result<String, LicenseError> {
        match self {
            Self::Rolling => Ok(checksum(organization, expiry, seats)),
            Self::Keyed(key) => {
                let tag = key.tag(checksum_input(organization, expiry, seats).as_bytes())?;
                Ok(pad_checksum(to_base36(tag % CHECKSUM_SPACE)))
            }
        }
    }
}

/// Rolling-hash checksum of organization, expiry and optional seats
///
/// The organization is uppercased first, so the result does not depend on
/// its case.
pub fn checksum(organization: &str, expiry: &str, seats: Option<&str>) -> String {
    let hash = rolling_hash(&checksum_input(organization, expiry, seats));
    let magnitude = i64::from(hash).unsigned_abs();
    let mut digits = to_base36(magnitude);
    digits.truncate(CHECKSUM_LEN);
    pad_checksum(digits)
}

fn checksum_input(organization: &str, expiry: &str, seats: Option<&str>) -> String {
    let mut input = format!("{}-{}", organization.to_uppercase(), expiry);
    if let Some(seats) = seats {
        input.push('-');
        input.push_str(seats);
    }
    input
}

/// `h = h * 31 + unit` over UTF-16 code units with 32-bit wrap-around
fn rolling_hash(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(BASE36_DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    // Only ASCII digits were pushed
    out.into_iter().map(char::from).collect()
}

fn pad_checksum(digits: String) -> String {
    format!("{:0>width$}", digits, width = CHECKSUM_LEN)
}

/// Generate a reseller key with the rolling checksum
pub fn generate_reseller_key(
    organization: &str,
    seats: u32,
    expiry: NaiveDate,
) -> Result<String, LicenseError> {
    generate_reseller_key_with(&ChecksumScheme::Rolling, organization, seats, expiry)
}

/// Generate a reseller key under the given checksum scheme
pub fn generate_reseller_key_with(
    scheme: &ChecksumScheme,
    organization: &str,
    seats: u32,
    expiry: NaiveDate,
) -> Result<String, LicenseError> {
    if seats < MIN_RESELLER_SEATS {
        return Err(LicenseError::SeatsBelowMinimum {
            seats,
            minimum: MIN_RESELLER_SEATS,
        });
    }
    let organization = normalize_organization(organization)?;
    ensure_encodable(&expiry)?;

    let expiry = encode_expiry(&expiry);
    let seats = seats.to_string();
    let checksum = scheme.compute(&organization, &expiry, Some(&seats))?;

    debug!(%organization, %seats, %expiry, "generated reseller key");
    Ok(format!(
        "{}-{}-{}-{}-{}-{}",
        KEY_PREFIX,
        PartnerType::Reseller.code(),
        organization,
        seats,
        expiry,
        checksum
    ))
}

/// Generate a solution key with the rolling checksum
pub fn generate_solution_key(
    organization: &str,
    expiry: NaiveDate,
) -> Result<String, LicenseError> {
    generate_solution_key_with(&ChecksumScheme::Rolling, organization, expiry)
}

/// Generate a solution key under the given checksum scheme
pub fn generate_solution_key_with(
    scheme: &ChecksumScheme,
    organization: &str,
    expiry: NaiveDate,
) -> Result<String, LicenseError> {
    let organization = normalize_organization(organization)?;
    ensure_encodable(&expiry)?;

    let expiry = encode_expiry(&expiry);
    let checksum = scheme.compute(&organization, &expiry, None)?;

    debug!(%organization, %expiry, "generated solution key");
    Ok(format!(
        "{}-{}-{}-{}-{}",
        KEY_PREFIX,
        PartnerType::Solution.code(),
        organization,
        expiry,
        checksum
    ))
}

/// Re-derive the checksum of a parsed key and compare
pub fn verify_checksum(
    parsed: &ParsedPartnerLicense,
    scheme: &ChecksumScheme,
) -> Result<(), LicenseError> {
    let expiry = encode_expiry(&parsed.expires_at);
    let seats = parsed.purchased_seats.map(|s| s.to_string());
    let expected = scheme.compute(&parsed.organization, &expiry, seats.as_deref())?;

    if expected != parsed.checksum {
        warn!(organization = %parsed.organization, "license checksum mismatch");
        return Err(LicenseError::ChecksumMismatch {
            expected,
            found: parsed.checksum.clone(),
        });
    }
    Ok(())
}

fn normalize_organization(organization: &str) -> Result<String, LicenseError> {
    let trimmed = organization.trim();
    if trimmed.is_empty() || trimmed.contains('-') {
        return Err(LicenseError::InvalidOrganization(organization.to_string()));
    }
    Ok(trimmed.to_uppercase())
}
