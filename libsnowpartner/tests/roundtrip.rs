//! Generate → parse properties for partner license keys

use chrono::{Duration, Local, NaiveDate};
use proptest::prelude::*;

use snow_partner::license::{
    decode_expiry, encode_expiry, generate_reseller_key, generate_solution_key, parse, validate_at,
    verify_checksum, ChecksumScheme, LicenseError, PartnerType, CHECKSUM_LEN,
};

fn future_date() -> impl Strategy<Value = NaiveDate> {
    (2027i32..=2099, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn organization() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{1,15}"
}

proptest! {
    #[test]
    fn prop_reseller_round_trip(
        org in organization(),
        seats in 25u32..100_000,
        expiry in future_date(),
    ) {
        let key = generate_reseller_key(&org, seats, expiry).unwrap();
        let parsed = parse(&key).unwrap();

        prop_assert_eq!(parsed.partner_type, PartnerType::Reseller);
        prop_assert_eq!(&parsed.organization, &org.to_uppercase());
        prop_assert_eq!(parsed.purchased_seats, Some(seats));
        prop_assert!(parsed.referral_code.is_none());
        prop_assert_eq!(parsed.expires_at.date_naive(), expiry);
        prop_assert_eq!(parsed.checksum.len(), CHECKSUM_LEN);
        prop_assert!(verify_checksum(&parsed, &ChecksumScheme::Rolling).is_ok());
    }

    #[test]
    fn prop_solution_round_trip(org in organization(), expiry in future_date()) {
        let key = generate_solution_key(&org, expiry).unwrap();
        let parsed = parse(&key).unwrap();

        prop_assert_eq!(parsed.partner_type, PartnerType::Solution);
        prop_assert_eq!(&parsed.organization, &org.to_uppercase());
        prop_assert_eq!(parsed.purchased_seats, None);
        let expected_referral = format!("SOLUTION-{}", org.to_uppercase());
        prop_assert_eq!(parsed.referral_code.as_deref(), Some(expected_referral.as_str()));
        prop_assert_eq!(parsed.expires_at.date_naive(), expiry);
    }

    #[test]
    fn prop_expiry_codec_inverse(y in 2020i32..=2100, m in 1u32..=12, d in 1u32..=31) {
        let token = format!("{:04}{:02}{:02}", y, m, d);
        match NaiveDate::from_ymd_opt(y, m, d) {
            Some(_) => prop_assert_eq!(encode_expiry(&decode_expiry(&token).unwrap()), token),
            None => prop_assert!(matches!(
                decode_expiry(&token),
                Err(LicenseError::InvalidExpiryDate(_))
            )),
        }
    }

    #[test]
    fn prop_generated_keys_valid_before_expiry(
        org in organization(),
        seats in 25u32..10_000,
        expiry in future_date(),
    ) {
        let parsed = parse(&generate_reseller_key(&org, seats, expiry).unwrap()).unwrap();
        let now = parsed.expires_at - Duration::days(1);

        prop_assert!(validate_at(&parsed, now).is_valid);
    }
}

#[test]
fn seat_floor_boundary() {
    let expiry = (Local::now() + Duration::days(365)).date_naive();

    assert!(matches!(
        generate_reseller_key("ACME", 24, expiry),
        Err(LicenseError::SeatsBelowMinimum { seats: 24, .. })
    ));
    assert!(generate_reseller_key("ACME", 25, expiry).is_ok());
}

#[test]
fn concrete_scenarios() {
    let reseller = parse("SNOW-RESELLER-ACME-100-20261231-ABC123").unwrap();
    assert_eq!(reseller.purchased_seats, Some(100));
    assert_eq!(reseller.checksum, "ABC123");

    let solution = parse("SNOW-SOLUTION-ACME-20261231-ABC123").unwrap();
    assert_eq!(solution.referral_code.as_deref(), Some("SOLUTION-ACME"));

    assert!(parse("SNOW-RESELLER-ACME-10-20261231-ABC123").is_err());
    assert_eq!(
        parse("BADPREFIX-RESELLER-ACME-100-20261231-ABC123"),
        Err(LicenseError::InvalidPrefix)
    );
}
