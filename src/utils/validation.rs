//! Identifier validation
//!
//! Team and user identifiers double as record-name components in the
//! external store, so they follow RFC 1123 label rules: 1-63 characters,
//! lowercase alphanumerics and hyphens, alphanumeric at both ends.

use crate::utils::error::{KeyforgeError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static DNS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("static pattern"));

/// Check whether a string is a valid DNS label.
pub fn is_valid_dns_label(value: &str) -> bool {
    !value.is_empty() && value.len() <= 63 && DNS_LABEL.is_match(value)
}

/// Validate a team identifier.
pub fn validate_team_id(team_id: &str) -> Result<()> {
    if is_valid_dns_label(team_id) {
        Ok(())
    } else {
        Err(KeyforgeError::validation(
            "team_id must contain only lowercase alphanumeric characters and hyphens, \
             start and end with an alphanumeric character, and be 1-63 characters long",
        ))
    }
}

/// Validate a user identifier (same rules as team identifiers).
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if is_valid_dns_label(user_id) {
        Ok(())
    } else {
        Err(KeyforgeError::validation(
            "user_id must contain only lowercase alphanumeric characters and hyphens, \
             start and end with an alphanumeric character, and be 1-63 characters long",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_labels() {
        assert!(is_valid_dns_label("team1"));
        assert!(is_valid_dns_label("a"));
        assert!(is_valid_dns_label("ml-research"));
        assert!(is_valid_dns_label("0leading-digit"));
    }

    #[test]
    fn test_invalid_labels() {
        assert!(!is_valid_dns_label(""));
        assert!(!is_valid_dns_label("-leading-hyphen"));
        assert!(!is_valid_dns_label("trailing-hyphen-"));
        assert!(!is_valid_dns_label("Uppercase"));
        assert!(!is_valid_dns_label("under_score"));
        assert!(!is_valid_dns_label(&"a".repeat(64)));
    }

    #[test]
    fn test_max_length_accepted() {
        assert!(is_valid_dns_label(&"a".repeat(63)));
    }

    #[test]
    fn test_validate_team_id_error_kind() {
        let err = validate_team_id("Not-Valid!").unwrap_err();
        assert!(matches!(err, KeyforgeError::Validation(_)));
    }
}
