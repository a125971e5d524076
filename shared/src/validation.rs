//! Input validation functions
//!
//! Checks applied to signup and login bodies before any storage access.

use validator::ValidateEmail;

/// Upper bound on accepted passwords; hashing cost grows with input length
pub const MAX_PASSWORD_LEN: usize = 128;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password
///
/// No strength policy is enforced here, only presence and an upper bound.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a full email/password pair
pub fn validate_credentials(email: &str, password: &str) -> Result<(), String> {
    validate_email(email)?;
    validate_password(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("a@x.com")]
    #[case("first.last@example.org")]
    #[case("user+tag@sub.domain.io")]
    fn test_valid_emails(#[case] email: &str) {
        assert!(validate_email(email).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("not-an-email")]
    #[case("@missing-local.com")]
    #[case("missing-at.example.com")]
    fn test_invalid_emails(#[case] email: &str) {
        assert!(validate_email(email).is_err());
    }

    #[test]
    fn test_short_password_is_accepted() {
        assert!(validate_password("pw1").is_ok());
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_overlong_password_rejected() {
        let password = "x".repeat(MAX_PASSWORD_LEN + 1);
        assert!(validate_password(&password).is_err());
    }

    #[test]
    fn test_credentials_checks_email_first() {
        let err = validate_credentials("nope", "").unwrap_err();
        assert_eq!(err, "Invalid email format");
    }

    proptest! {
        #[test]
        fn prop_passwords_within_bounds_accepted(password in "[ -~]{1,128}") {
            prop_assert!(validate_password(&password).is_ok());
        }
    }
}
