use std::sync::LazyLock;

use regex::Regex;

/// Longest address accepted, counted in characters of the raw value.
pub const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("valid email regex"));

/// Permissive single-pass check: a local part and a domain without
/// whitespace or `@`, and a top-level segment of at least two characters.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    if raw.is_empty() || raw.chars().count() > MAX_EMAIL_LEN {
        return false;
    }
    EMAIL_RE.is_match(raw.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_address() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("jan.novak+eshop@example.cz"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(is_valid_email("  a@b.co \n"));
    }

    #[test]
    fn rejects_missing_or_short_tld() {
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b.c"));
    }

    #[test]
    fn rejects_malformed_shapes() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.cz"));
    }

    #[test]
    fn rejects_overlong_address_regardless_of_shape() {
        let local = "a".repeat(MAX_EMAIL_LEN + 1 - "@b.co".len());
        let address = format!("{local}@b.co");
        assert_eq!(address.len(), 255);
        assert!(!is_valid_email(&address));

        let at_limit = format!("{}@b.co", &local[1..]);
        assert!(is_valid_email(&at_limit));
    }
}
