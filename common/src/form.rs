//! Helpers for reading HTML form input.
//!
//! Browsers send every field as a string, missing checkboxes are omitted entirely, and
//! identifiers arrive as free text. These helpers normalize that input before it reaches a
//! service.

/// Trim a submitted value, treating an absent field as empty.
pub fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Parse a record id, accepting only plain decimal digits.
pub fn parse_id(value: Option<&str>) -> Option<i32> {
    let value = value?.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// A checkbox counts as checked when it was submitted with any non-empty value.
pub fn checkbox(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Map an empty string to `None`.
pub fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids() {
        assert_eq!(Some(42), parse_id(Some(" 42 ")));
        assert_eq!(None, parse_id(Some("-1")));
        assert_eq!(None, parse_id(Some("4a")));
        assert_eq!(None, parse_id(Some("")));
        assert_eq!(None, parse_id(None));
        assert_eq!(None, parse_id(Some("99999999999")));
    }

    #[test]
    fn checkboxes() {
        assert!(checkbox(Some("on")));
        assert!(!checkbox(Some("")));
        assert!(!checkbox(None));
    }

    #[test]
    fn trimming() {
        assert_eq!("Dock 3", trimmed(Some("  Dock 3\n")));
        assert_eq!("", trimmed(None));
    }
}
