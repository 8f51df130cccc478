//! Email validation functions

use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_MESSAGE: &str = "Invalid email address.";

// Email validation regex
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Empty input passes; presence is the job of `validate_required`.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() || is_valid_email(email) {
        Ok(())
    } else {
        Err(EMAIL_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test.user@example.co.uk"));
        assert!(is_valid_email("user+tag@example.com"));
        assert!(is_valid_email("user_name@example-domain.com"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@example.c"));
    }

    #[test]
    fn test_validate_email_skips_empty() {
        assert!(validate_email("").is_ok());
        assert_eq!(validate_email("nope").unwrap_err(), "Invalid email address.");
    }
}
