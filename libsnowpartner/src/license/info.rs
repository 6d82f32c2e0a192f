//! Human-readable license summaries

use chrono::{DateTime, Local};

use super::key::{ExpiryStatus, ParsedPartnerLicense, PartnerType};
use crate::config::PartnerConfig;

/// Summarise a license with the default partner program terms
pub fn format_info(parsed: &ParsedPartnerLicense) -> String {
    format_info_with(parsed, &PartnerConfig::default(), Local::now())
}

/// Summarise a license against explicit terms and clock
///
/// Lines are joined with `\n`; there is no trailing newline.
pub fn format_info_with(
    parsed: &ParsedPartnerLicense,
    config: &PartnerConfig,
    now: DateTime<Local>,
) -> String {
    let mut lines = vec![
        format!("Partner License: {}", parsed.partner_type),
        format!("Organization: {}", parsed.organization),
        String::new(),
    ];

    match parsed.partner_type {
        PartnerType::Reseller => lines.extend(reseller_lines(parsed, config)),
        PartnerType::Solution => lines.extend(solution_lines(parsed, config)),
    }

    let status = match parsed.expiry_status_at(now, config.expiry_warning_days) {
        ExpiryStatus::Expired { days_overdue } => {
            format!("EXPIRED ({} {} ago)", days_overdue, plural_days(days_overdue))
        }
        ExpiryStatus::ExpiringSoon { days_remaining } => format!(
            "Expires soon ({} {} remaining), renew now",
            days_remaining,
            plural_days(days_remaining)
        ),
        ExpiryStatus::Active { days_remaining } => {
            format!("Active ({} {} remaining)", days_remaining, plural_days(days_remaining))
        }
    };

    lines.push(String::new());
    lines.push(format!("Expires: {}", parsed.expires_at.format("%Y-%m-%d")));
    lines.push(format!("Status: {}", status));

    lines.join("\n")
}

fn reseller_lines(parsed: &ParsedPartnerLicense, config: &PartnerConfig) -> Vec<String> {
    let seats = parsed.purchased_seats.unwrap_or(0);
    let pricing = &config.pricing;

    let price = pricing.price_per_seat(seats);
    let retail = pricing.suggested_retail_per_seat;
    let wholesale_total = u64::from(seats) * u64::from(price);
    let retail_total = u64::from(seats) * u64::from(retail);
    let margin = retail_total as i64 - wholesale_total as i64;
    let margin_percent = if retail_total == 0 {
        0.0
    } else {
        margin as f64 / retail_total as f64 * 100.0
    };

    vec![
        format!("Seats: {}", seats),
        format!("Wholesale Price: ${}/seat/month", price),
        format!("Monthly Wholesale: {}", dollars(wholesale_total as i64)),
        format!(
            "Suggested Retail: ${}/seat/month ({}/month)",
            retail,
            dollars(retail_total as i64)
        ),
        format!("Monthly Margin: {} ({:.1}%)", dollars(margin), margin_percent),
    ]
}

fn solution_lines(parsed: &ParsedPartnerLicense, config: &PartnerConfig) -> Vec<String> {
    let commission = &config.commission;

    vec![
        format!(
            "Referral Code: {}",
            parsed.referral_code.as_deref().unwrap_or("-")
        ),
        format!("Commission (year 1): {}%", commission.first_year_percent),
        format!("Commission (year 2+): {}%", commission.renewal_percent),
    ]
}

fn plural_days(n: i64) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

/// `$1,234` style amounts
fn dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::parse;
    use chrono::Duration;

    #[test]
    fn test_reseller_mid_tier() {
        let parsed = parse("SNOW-RESELLER-ACME-100-20261231-ABC123").unwrap();
        let now = parsed.expires_at - Duration::days(90);
        let info = format_info_with(&parsed, &PartnerConfig::default(), now);

        assert!(info.contains("Partner License: RESELLER"));
        assert!(info.contains("Organization: ACME"));
        assert!(info.contains("Seats: 100"));
        assert!(info.contains("Wholesale Price: $59/seat/month"));
        assert!(!info.contains("$69/seat"));
        assert!(info.contains("Monthly Wholesale: $5,900"));
        assert!(info.contains("Suggested Retail: $99/seat/month ($9,900/month)"));
        assert!(info.contains("Monthly Margin: $4,000 (40.4%)"));
        assert!(info.contains("Expires: 2026-12-31"));
        assert!(info.contains("Status: Active (90 days remaining)"));
    }

    #[test]
    fn test_reseller_tiers() {
        let config = PartnerConfig::default();
        let small = parse("SNOW-RESELLER-ACME-25-20261231-ABC123").unwrap();
        let large = parse("SNOW-RESELLER-ACME-500-20261231-ABC123").unwrap();
        let now = small.expires_at - Duration::days(90);

        let small_info = format_info_with(&small, &config, now);
        let large_info = format_info_with(&large, &config, now);
        assert!(small_info.contains("Wholesale Price: $69/seat/month"));
        assert!(large_info.contains("Wholesale Price: $49/seat/month"));
    }

    #[test]
    fn test_solution_layout() {
        let parsed = parse("SNOW-SOLUTION-ACME-20261231-ABC123").unwrap();
        let now = parsed.expires_at - Duration::days(90);
        let info = format_info_with(&parsed, &PartnerConfig::default(), now);

        let expected = [
            "Partner License: SOLUTION",
            "Organization: ACME",
            "",
            "Referral Code: SOLUTION-ACME",
            "Commission (year 1): 15%",
            "Commission (year 2+): 10%",
            "",
            "Expires: 2026-12-31",
            "Status: Active (90 days remaining)",
        ]
        .join("\n");
        assert_eq!(info, expected);
    }

    #[test]
    fn test_solution_info() {
        let parsed = parse("SNOW-SOLUTION-ACME-20261231-ABC123").unwrap();
        let now = parsed.expires_at - Duration::days(90);
        let info = format_info_with(&parsed, &PartnerConfig::default(), now);

        assert!(info.contains("Partner License: SOLUTION"));
        assert!(info.contains("Referral Code: SOLUTION-ACME"));
        assert!(info.contains("Commission (year 1): 15%"));
        assert!(info.contains("Commission (year 2+): 10%"));
        assert!(!info.contains("Seats:"));
    }

    #[test]
    fn test_status_lines() {
        let parsed = parse("SNOW-SOLUTION-ACME-20261231-ABC123").unwrap();
        let config = PartnerConfig::default();

        let soon = format_info_with(&parsed, &config, parsed.expires_at - Duration::days(5));
        assert!(soon.contains("Status: Expires soon (5 days remaining)"));

        let expired = format_info_with(&parsed, &config, parsed.expires_at + Duration::days(12));
        assert!(expired.contains("Status: EXPIRED (12 days ago)"));

        let one_day = format_info_with(&parsed, &config, parsed.expires_at + Duration::hours(2));
        assert!(one_day.contains("Status: EXPIRED (1 day ago)"));
    }

    #[test]
    fn test_custom_warning_window() {
        let parsed = parse("SNOW-SOLUTION-ACME-20261231-ABC123").unwrap();
        let config = PartnerConfig {
            expiry_warning_days: 60,
            ..PartnerConfig::default()
        };
        let info = format_info_with(&parsed, &config, parsed.expires_at - Duration::days(45));
        assert!(info.contains("Expires soon (45 days remaining)"));
    }

    #[test]
    fn test_dollars() {
        assert_eq!(dollars(0), "$0");
        assert_eq!(dollars(999), "$999");
        assert_eq!(dollars(1_000), "$1,000");
        assert_eq!(dollars(1_234_567), "$1,234,567");
        assert_eq!(dollars(-2_500), "-$2,500");
    }

    #[test]
    fn test_format_info_defaults() {
        let parsed = parse("SNOW-RESELLER-ACME-100-20261231-ABC123").unwrap();
        assert!(format_info(&parsed).starts_with("Partner License: RESELLER"));
    }
}
