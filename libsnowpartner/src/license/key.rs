//! Partner License Key Parsing

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::expiry::decode_expiry;
use crate::security::MacError;

/// Leading token of every partner license key
pub const KEY_PREFIX: &str = "SNOW";

/// Business floor for reseller seat counts
pub const MIN_RESELLER_SEATS: u32 = 25;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// License key errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseError {
    /// Empty input
    #[error("License key is required")]
    Missing,

    /// Key does not start with `SNOW-` or has too few fields
    #[error("Invalid partner license key format: must start with SNOW-")]
    InvalidPrefix,

    /// Unknown partner type token
    #[error("Invalid partner type: {0}. Must be RESELLER or SOLUTION")]
    InvalidPartnerType(String),

    /// Wrong field count for a reseller key
    #[error("Invalid RESELLER license format. Expected: SNOW-RESELLER-ORG-SEATS-YYYYMMDD-CHECKSUM")]
    InvalidResellerFormat,

    /// Wrong field count for a solution key
    #[error("Invalid SOLUTION license format. Expected: SNOW-SOLUTION-ORG-YYYYMMDD-CHECKSUM")]
    InvalidSolutionFormat,

    /// Seat token is not a number
    #[error("Invalid seat count: {0}")]
    InvalidSeats(String),

    /// Seat token is numeric but too large to represent
    #[error("Seat count out of range: {0}")]
    SeatsOutOfRange(String),

    /// Seat count under the reseller floor
    #[error("Reseller licenses require a minimum of {minimum} seats (got {seats})")]
    SeatsBelowMinimum {
        /// Requested seats
        seats: u32,
        /// Required minimum
        minimum: u32,
    },

    /// Expiry token is not eight digits
    #[error("Invalid expiry date format: expected YYYYMMDD")]
    InvalidExpiryFormat,

    /// Expiry component outside its allowed range
    #[error("Invalid expiry {field}: {value}")]
    ExpiryOutOfRange {
        /// Which component (year, month, day)
        field: &'static str,
        /// Offending value
        value: i32,
    },

    /// Expiry passes the range checks but is not a real calendar instant
    #[error("Invalid expiry date: {0}")]
    InvalidExpiryDate(String),

    /// Organization cannot be encoded in a key
    #[error("Invalid organization name: {0:?}")]
    InvalidOrganization(String),

    /// Explicit checksum verification failed
    #[error("License checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch {
        /// Checksum derived from the key fields
        expected: String,
        /// Checksum carried by the key
        found: String,
    },

    /// Keyed checksum failure
    #[error(transparent)]
    Security(#[from] MacError),
}

/// License tier. Partner keys only ever carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseTier {
    /// Partner program license
    Partner,
}

impl LicenseTier {
    /// Tier tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partner => "PARTNER",
        }
    }
}

/// Partner program track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerType {
    /// Buys seats wholesale for resale
    Reseller,
    /// Earns referral commission
    Solution,
}

impl PartnerType {
    /// Type token used in keys
    pub fn code(&self) -> &'static str {
        match self {
            Self::Reseller => "RESELLER",
            Self::Solution => "SOLUTION",
        }
    }

    /// Parse from type token
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "RESELLER" => Some(Self::Reseller),
            "SOLUTION" => Some(Self::Solution),
            _ => None,
        }
    }
}

impl fmt::Display for PartnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Where a license stands relative to a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    /// Past the expiry instant
    Expired {
        /// Whole days since expiry, rounded up
        days_overdue: i64,
    },
    /// Inside the warning window
    ExpiringSoon {
        /// Whole days left, rounded up
        days_remaining: i64,
    },
    /// Comfortably valid
    Active {
        /// Whole days left, rounded up
        days_remaining: i64,
    },
}

/// Decoded partner license key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPartnerLicense {
    /// Always [`LicenseTier::Partner`]
    pub tier: LicenseTier,
    /// Track, decides which of seats / referral code is set
    pub partner_type: PartnerType,
    /// Organization token, case preserved
    pub organization: String,
    /// Reseller seats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased_seats: Option<u32>,
    /// Solution referral code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    /// End of the expiry day (23:59:59 local)
    pub expires_at: DateTime<Local>,
    /// Checksum token as found in the key
    pub checksum: String,
    /// Input string
    pub raw_key: String,
}

impl ParsedPartnerLicense {
    /// Check if the license is expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Local>) -> bool {
        self.expires_at < now
    }

    /// Check if the license is expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Local::now())
    }

    /// Expiry standing at `now`, warning when `warning_days` or fewer remain
    pub fn expiry_status_at(&self, now: DateTime<Local>, warning_days: i64) -> ExpiryStatus {
        let delta_ms = (self.expires_at - now).num_milliseconds();
        if delta_ms < 0 {
            return ExpiryStatus::Expired {
                days_overdue: ceil_days(-delta_ms),
            };
        }
        let days_remaining = ceil_days(delta_ms);
        if days_remaining <= warning_days {
            ExpiryStatus::ExpiringSoon { days_remaining }
        } else {
            ExpiryStatus::Active { days_remaining }
        }
    }
}

impl FromStr for ParsedPartnerLicense {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn ceil_days(ms: i64) -> i64 {
    (ms + MS_PER_DAY - 1) / MS_PER_DAY
}

/// Parse a partner license key
///
/// The checksum field is taken as-is; use
/// [`verify_checksum`](super::verify_checksum) to check it.
pub fn parse(raw_key: &str) -> Result<ParsedPartnerLicense, LicenseError> {
    if raw_key.is_empty() {
        return Err(LicenseError::Missing);
    }

    let parts: Vec<&str> = raw_key.split('-').collect();
    if parts.len() < 4 || parts[0] != KEY_PREFIX {
        return Err(LicenseError::InvalidPrefix);
    }

    let partner_type = PartnerType::from_code(parts[1])
        .ok_or_else(|| LicenseError::InvalidPartnerType(parts[1].to_string()))?;

    let license = match partner_type {
        PartnerType::Reseller => parse_reseller(&parts, raw_key)?,
        PartnerType::Solution => parse_solution(&parts, raw_key)?,
    };

    debug!(
        partner_type = %license.partner_type,
        organization = %license.organization,
        "parsed partner license"
    );
    Ok(license)
}

fn parse_reseller(parts: &[&str], raw_key: &str) -> Result<ParsedPartnerLicense, LicenseError> {
    let [_, _, organization, seats, expiry, checksum] = parts else {
        return Err(LicenseError::InvalidResellerFormat);
    };

    let seats: u32 = seats.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => LicenseError::SeatsOutOfRange(seats.to_string()),
        _ => LicenseError::InvalidSeats(seats.to_string()),
    })?;
    if seats < MIN_RESELLER_SEATS {
        return Err(LicenseError::SeatsBelowMinimum {
            seats,
            minimum: MIN_RESELLER_SEATS,
        });
    }

    Ok(ParsedPartnerLicense {
        tier: LicenseTier::Partner,
        partner_type: PartnerType::Reseller,
        organization: organization.to_string(),
        purchased_seats: Some(seats),
        referral_code: None,
        expires_at: decode_expiry(expiry)?,
        checksum: checksum.to_string(),
        raw_key: raw_key.to_string(),
    })
}

fn parse_solution(parts: &[&str], raw_key: &str) -> Result<ParsedPartnerLicense, LicenseError> {
    let [_, _, organization, expiry, checksum] = parts else {
        return Err(LicenseError::InvalidSolutionFormat);
    };

    Ok(ParsedPartnerLicense {
        tier: LicenseTier::Partner,
        partner_type: PartnerType::Solution,
        organization: organization.to_string(),
        purchased_seats: None,
        referral_code: Some(referral_code(organization)),
        expires_at: decode_expiry(expiry)?,
        checksum: checksum.to_string(),
        raw_key: raw_key.to_string(),
    })
}

/// Referral code for a solution partner
pub fn referral_code(organization: &str) -> String {
    format!("SOLUTION-{}", organization.to_uppercase())
}
