//! Loose email address validation shared by sign-up and the payment form.

use std::sync::OnceLock;

use regex::Regex;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Whether `text` looks like `local@domain.tld` with no whitespace.
pub fn is_valid_email(text: &str) -> bool {
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
        .is_match(text)
}

#[cfg(test)]
mod tests {
    use super::is_valid_email;

    #[test]
    fn accepts_simple_addresses() {
        assert!(is_valid_email("admin@org.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.nz"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("admin"));
        assert!(!is_valid_email("admin@org"));
        assert!(!is_valid_email("ad min@org.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }
}
