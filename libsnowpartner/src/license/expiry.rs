//! Expiry Date Codec
//!
//! Expiry dates travel as `YYYYMMDD` and decode to the last second of that
//! day in local time, so a license stays valid through its expiry day.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

use super::LicenseError;

/// Earliest accepted expiry year
pub const MIN_EXPIRY_YEAR: i32 = 2020;

/// Latest accepted expiry year
pub const MAX_EXPIRY_YEAR: i32 = 2100;

/// Decode an eight-digit expiry token
pub fn decode_expiry(token: &str) -> Result<DateTime<Local>, LicenseError> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LicenseError::InvalidExpiryFormat);
    }

    let year = digits(&token[0..4])?;
    let month = digits(&token[4..6])?;
    let day = digits(&token[6..8])?;

    check_range("year", year, MIN_EXPIRY_YEAR, MAX_EXPIRY_YEAR)?;
    check_range("month", month, 1, 12)?;
    check_range("day", day, 1, 31)?;

    // Strict calendar construction: Feb 30 and friends are rejected here
    let end_of_day = NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .ok_or_else(|| LicenseError::InvalidExpiryDate(token.to_string()))?;

    Local
        .from_local_datetime(&end_of_day)
        .earliest()
        .ok_or_else(|| LicenseError::InvalidExpiryDate(token.to_string()))
}

/// Encode a date as `YYYYMMDD`
pub fn encode_expiry<D: Datelike>(date: &D) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

/// Check that a date can be carried by a key
pub(crate) fn ensure_encodable(date: &NaiveDate) -> Result<(), LicenseError> {
    check_range("year", date.year(), MIN_EXPIRY_YEAR, MAX_EXPIRY_YEAR)
}

fn digits(s: &str) -> Result<i32, LicenseError> {
    s.parse().map_err(|_| LicenseError::InvalidExpiryFormat)
}

fn check_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<(), LicenseError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(LicenseError::ExpiryOutOfRange { field, value })
    }
}
