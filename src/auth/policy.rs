//! Identity and password acceptance rules.
//!
//! ## Design
//! - Pure functions over `&str`: no I/O, no clock, no store access.
//! - Policy runs once at account creation and password reset. Stored
//!   records are trusted afterwards, so tightening a rule here never
//!   locks an existing account out.
//! - Callers trim identities before checking; embedded whitespace is
//!   rejected by the pattern itself.

use regex::Regex;
use std::sync::LazyLock;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Symbols that satisfy the special-character requirement.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Local part, `@`, domain with at least one dot. Deliberately loose:
/// the goal is catching typos, not RFC 5322 conformance.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").unwrap());

/// Returns true when `email` looks like a plausible address.
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Returns true when `password` meets every strength rule: minimum
/// length plus at least one uppercase, lowercase, digit, and symbol
/// from [`PASSWORD_SYMBOLS`].
pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        for email in [
            "user@example.com",
            "first.last@sub.domain.org",
            "a_b-c@host.co",
            "digits123@mail42.io",
        ] {
            assert!(valid_email(email), "should accept {email}");
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in [
            "",
            "plainaddress",
            "user@domain",
            "@example.com",
            "user@.com",
            "two words@example.com",
            "user@exam ple.com",
            " user@example.com",
        ] {
            assert!(!valid_email(email), "should reject {email:?}");
        }
    }

    #[test]
    fn accepts_password_with_all_classes() {
        assert!(valid_password("Abcdefg1!"));
        assert!(valid_password("xY9?zzzz"));
    }

    #[test]
    fn rejects_password_missing_one_class() {
        // Each candidate satisfies every rule except the named one.
        assert!(!valid_password("Abcdefgh!"), "no digit");
        assert!(!valid_password("abcdefg1!"), "no uppercase");
        assert!(!valid_password("ABCDEFG1!"), "no lowercase");
        assert!(!valid_password("Abcdefg12"), "no symbol");
        assert!(!valid_password("Ab1!xyz"), "too short");
    }

    #[test]
    fn length_is_counted_in_characters() {
        // Seven multi-byte characters plus filler classes stay short.
        assert!(!valid_password("Até1!aé"));
    }
}
