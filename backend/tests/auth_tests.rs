//! Authentication integration tests
//!
//! Covers the account input validation rules shared between the sign-up
//! form (via WASM) and the backend auth service.

use proptest::prelude::*;

use shared::validation::{validate_email, validate_password};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_accepts_plain_addresses() {
        for email in [
            "farmer@example.com",
            "jan.van.der.merwe@farm.co.za",
            "info@agri.org",
        ] {
            assert!(validate_email(email).is_ok(), "{}", email);
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for email in ["", "plain", "no-at-sign.com", "a@b", "@."] {
            assert!(validate_email(email).is_err(), "{}", email);
        }
    }

    #[test]
    fn test_password_length_boundary() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Password acceptance depends only on length
        #[test]
        fn prop_password_length_threshold(password in "[ -~]{0,40}") {
            let accepted = validate_password(&password).is_ok();
            prop_assert_eq!(accepted, password.len() >= 8);
        }

        /// A valid email survives having a display-safe local part
        #[test]
        fn prop_wellformed_emails_accepted(local in "[a-z]{1,12}", domain in "[a-z]{1,12}") {
            let email = format!("{}@{}.com", local, domain);
            prop_assert!(validate_email(&email).is_ok());
        }

        /// Validation never panics on arbitrary input
        #[test]
        fn prop_email_validation_is_total(input in "[ -~]{0,60}") {
            let _ = validate_email(&input);
        }
    }
}
