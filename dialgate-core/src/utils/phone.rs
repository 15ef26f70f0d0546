//! E.164 phone number helpers.

/// Validates an E.164 number: `+`, a non-zero leading digit, 2 to 15 digits.
#[must_use]
pub fn is_valid_e164(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('+') else {
        return false;
    };
    if !(2..=15).contains(&digits.len()) {
        return false;
    }
    let mut chars = digits.chars();
    matches!(chars.next(), Some('1'..='9')) && chars.all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_numbers() {
        assert!(is_valid_e164("+15551234567"));
        assert!(is_valid_e164("+442071838750"));
        assert!(is_valid_e164("+86"));
    }

    #[test]
    fn rejects_missing_plus() {
        assert!(!is_valid_e164("15551234567"));
    }

    #[test]
    fn rejects_leading_zero() {
        assert!(!is_valid_e164("+05551234567"));
    }

    #[test]
    fn rejects_non_digits() {
        assert!(!is_valid_e164("+1555123456a"));
        assert!(!is_valid_e164("+1 555 123 4567"));
        assert!(!is_valid_e164("client:user_42"));
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert!(!is_valid_e164("+1"));
        assert!(!is_valid_e164("+1234567890123456"));
        assert!(!is_valid_e164("+"));
        assert!(!is_valid_e164(""));
    }
}
