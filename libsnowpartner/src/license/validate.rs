//! Business-rule validation of parsed licenses

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::warn;

use super::key::{ParsedPartnerLicense, PartnerType, MIN_RESELLER_SEATS};

/// Outcome of [`validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// `true` iff `errors` is empty
    pub is_valid: bool,
    /// Every violated rule, in evaluation order
    pub errors: Vec<String>,
}

/// Validate against the current local time
pub fn validate(parsed: &ParsedPartnerLicense) -> ValidationResult {
    validate_at(parsed, Local::now())
}

/// Validate against an explicit clock
///
/// All rules are checked; a violation never hides a later one.
pub fn validate_at(parsed: &ParsedPartnerLicense, now: DateTime<Local>) -> ValidationResult {
    let mut errors = Vec::new();

    if parsed.expires_at < now {
        errors.push("License has expired".to_string());
    }

    match parsed.partner_type {
        PartnerType::Reseller => {
            if parsed.purchased_seats.map_or(true, |s| s < MIN_RESELLER_SEATS) {
                errors.push(format!(
                    "Reseller licenses require a minimum of {} seats",
                    MIN_RESELLER_SEATS
                ));
            }
        }
        PartnerType::Solution => {
            if parsed.referral_code.is_none() {
                errors.push("Solution partners require a referral code".to_string());
            }
        }
    }

    if parsed.organization.chars().count() < 2 {
        errors.push("Invalid organization name".to_string());
    }

    if !errors.is_empty() {
        warn!(
            organization = %parsed.organization,
            violations = errors.len(),
            "partner license failed validation"
        );
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::parse;
    use chrono::Duration;

    fn reseller() -> ParsedPartnerLicense {
        parse("SNOW-RESELLER-ACME-100-20261231-ABC123").unwrap()
    }

    #[test]
    fn test_valid_license() {
        let parsed = reseller();
        let now = parsed.expires_at - Duration::days(30);
        let result = validate_at(&parsed, now);

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_expiry_millisecond_boundary() {
        let parsed = reseller();

        let just_after = parsed.expires_at + Duration::milliseconds(1);
        let result = validate_at(&parsed, just_after);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["License has expired"]);

        let just_before = parsed.expires_at - Duration::milliseconds(1);
        assert!(validate_at(&parsed, just_before).is_valid);
    }

    #[test]
    fn test_reseller_seat_rule() {
        let mut parsed = reseller();
        let now = parsed.expires_at - Duration::days(1);

        parsed.purchased_seats = Some(24);
        assert_eq!(
            validate_at(&parsed, now).errors,
            vec!["Reseller licenses require a minimum of 25 seats"]
        );

        parsed.purchased_seats = None;
        assert!(!validate_at(&parsed, now).is_valid);
    }

    #[test]
    fn test_solution_referral_rule() {
        let mut parsed = parse("SNOW-SOLUTION-ACME-20261231-ABC123").unwrap();
        let now = parsed.expires_at - Duration::days(1);
        assert!(validate_at(&parsed, now).is_valid);

        parsed.referral_code = None;
        assert_eq!(
            validate_at(&parsed, now).errors,
            vec!["Solution partners require a referral code"]
        );
    }

    #[test]
    fn test_collects_every_violation() {
        let mut parsed = reseller();
        parsed.organization = "A".to_string();
        parsed.purchased_seats = Some(3);
        let now = parsed.expires_at + Duration::days(1);

        let result = validate_at(&parsed, now);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                "License has expired",
                "Reseller licenses require a minimum of 25 seats",
                "Invalid organization name",
            ]
        );
    }

    #[test]
    fn test_organization_length_counts_every_character() {
        let mut parsed = reseller();
        parsed.organization = " A".to_string();
        let now = parsed.expires_at - Duration::days(1);
        assert!(validate_at(&parsed, now).is_valid);
    }

    #[test]
    fn test_empty_organization() {
        let mut parsed = reseller();
        parsed.organization.clear();
        let now = parsed.expires_at - Duration::days(1);
        assert_eq!(validate_at(&parsed, now).errors, vec!["Invalid organization name"]);
    }
}
