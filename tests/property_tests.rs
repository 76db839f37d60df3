/// Property-based tests using proptest
/// Tests invariants and properties that should hold for all inputs
use proptest::prelude::*;
use zodiac_leads_api::csv_export::{escape_value, parse_columns, LeadColumn};
use zodiac_leads_api::validation::{
    format_br_phone_display, is_valid_email, parse_birth_year, validate_br_phone,
};
use zodiac_leads_api::zodiac::{resolve, spin_rotation, SEGMENT_ANGLE, SIGN_COUNT};

/// Undoes `escape_value` for a single cell.
fn unescape(cell: &str) -> String {
    match cell.strip_prefix('"').and_then(|c| c.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => cell.to_string(),
    }
}

// Property: the resolver is total and follows the 12-year cycle
proptest! {
    #[test]
    fn resolve_matches_cycle_formula(year in any::<i32>()) {
        let expected = (i64::from(year) - 4).rem_euclid(12) as u8;
        prop_assert_eq!(resolve(year).id, expected);
    }

    #[test]
    fn resolve_has_period_twelve(year in 1900i32..=2100) {
        prop_assert_eq!(resolve(year).id, resolve(year + 12).id);
        prop_assert_eq!(resolve(year).name, resolve(year - 12).name);
    }

    #[test]
    fn consecutive_years_advance_one_sign(year in -100_000i32..100_000) {
        let next = (resolve(year).id as usize + 1) % SIGN_COUNT;
        prop_assert_eq!(resolve(year + 1).id as usize, next);
    }

    #[test]
    fn spin_lands_on_target_segment(current in 0.0f64..100_000.0, id in 0u8..12) {
        let rotation = spin_rotation(current, id);
        // Always moves forward by at least three full turns
        prop_assert!(rotation - current > 360.0 * 3.0);
        let landed = rotation.rem_euclid(360.0);
        let expected = (-(f64::from(id)) * SEGMENT_ANGLE).rem_euclid(360.0);
        prop_assert!((landed - expected).abs() < 1e-6 || (landed - expected).abs() > 360.0 - 1e-6);
    }
}

// Property: birth year parsing never panics and respects the range
proptest! {
    #[test]
    fn birth_year_parsing_never_panics(raw in "\\PC*") {
        let _ = parse_birth_year(&raw);
    }

    #[test]
    fn four_digit_years_in_range_parse(year in 1900i32..=2100) {
        prop_assert_eq!(parse_birth_year(&year.to_string()), Some(year));
    }

    #[test]
    fn years_outside_range_rejected(year in prop_oneof![1000i32..1900, 2101i32..10_000]) {
        prop_assert_eq!(parse_birth_year(&year.to_string()), None);
    }
}

// Property: CSV cells are quoted exactly when needed and unescape cleanly
proptest! {
    #[test]
    fn escape_quotes_only_special_values(value in "\\PC*") {
        let escaped = escape_value(&value);
        let special = value.contains(',') || value.contains('"') || value.contains('\n');
        if special {
            prop_assert!(escaped.starts_with('"') && escaped.ends_with('"'));
        } else {
            prop_assert_eq!(escaped.as_ref(), value.as_str());
        }
    }

    #[test]
    fn escaped_values_unescape_to_original(value in "[a-zA-Z0-9 ,\"\n]{0,30}") {
        let escaped = escape_value(&value);
        prop_assert_eq!(unescape(&escaped), value);
    }

    #[test]
    fn column_selection_keeps_first_seen_order(
        picks in proptest::collection::vec(0usize..LeadColumn::ALL.len(), 1..20)
    ) {
        let raw = picks
            .iter()
            .map(|&i| LeadColumn::ALL[i].key())
            .collect::<Vec<_>>()
            .join(",");
        let parsed = parse_columns(Some(&raw)).unwrap();

        let mut expected: Vec<LeadColumn> = Vec::new();
        for &i in &picks {
            if !expected.contains(&LeadColumn::ALL[i]) {
                expected.push(LeadColumn::ALL[i]);
            }
        }
        prop_assert_eq!(parsed, expected);
    }
}

// Property: Email validation should never panic
proptest! {
    #[test]
    fn email_validation_never_panics(email in "\\PC*") {
        let _ = is_valid_email(&email);
    }

    #[test]
    fn well_formed_emails_accepted(
        local in "[a-z0-9]{1,10}",
        domain in "[a-z]{1,10}",
        tld in "[a-z]{2,4}"
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert!(is_valid_email(&email));
    }
}

// Property: Phone validation should never panic
proptest! {
    #[test]
    fn phone_validation_never_panics(phone in "\\PC*") {
        let _ = validate_br_phone(&phone);
        let _ = format_br_phone_display(&phone);
    }

    #[test]
    fn foreign_country_codes_rejected(cc in prop_oneof![Just(1u16), Just(44), Just(49), Just(351)], rest in 200000000u32..=999999999u32) {
        let phone = format!("+{} {}", cc, rest);
        prop_assert!(!validate_br_phone(&phone).0);
    }

    #[test]
    fn valid_br_phones_render_display_mask(ddd in 11u8..=99u8, number in 900000000u32..=999999999u32) {
        let phone = format!("{}{}", ddd, number);
        let (valid, normalized) = validate_br_phone(&phone);
        if valid {
            prop_assert!(normalized.starts_with("+55"));
            let display = format_br_phone_display(&normalized);
            prop_assert_eq!(display, format!("({}) {}-{}", ddd, &phone[2..7], &phone[7..]));
        }
    }
}
