//! Package name validation.
//!
//! Dart package names are lowercase identifiers: `[a-z0-9_]`, not starting
//! with a digit. Anything else cannot exist on pub.dev, so it is rejected
//! before a request is made and never reaches a URL path.

use crate::error::{PubError, PubResult};

/// Longest name pub.dev accepts
const MAX_NAME_LEN: usize = 64;

/// Check if a string is a well-formed Dart package name
pub fn is_valid_package_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {},
        _ => return false,
    }

    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Validate a package name, returning the trimmed name
pub fn validate_package_name(name: &str) -> PubResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PubError::invalid_argument("package_name", "must not be empty"));
    }
    if !is_valid_package_name(trimmed) {
        return Err(PubError::invalid_argument(
            "package_name",
            format!(
                "'{}' is not a valid package name (lowercase letters, digits and '_' only)",
                trimmed
            ),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_package_names() {
        assert!(is_valid_package_name("http"));
        assert!(is_valid_package_name("flutter_bloc"));
        assert!(is_valid_package_name("_internal"));
        assert!(is_valid_package_name("web3dart"));

        assert!(!is_valid_package_name(""));
        assert!(!is_valid_package_name("3d"));
        assert!(!is_valid_package_name("Provider"));
        assert!(!is_valid_package_name("my-package"));
        assert!(!is_valid_package_name("../etc/passwd"));
        assert!(!is_valid_package_name("a?b=c"));
    }

    #[test]
    fn test_validate_trims_whitespace() {
        assert_eq!(validate_package_name("  provider \n").unwrap(), "provider");
    }

    #[test]
    fn test_validate_rejects_empty() {
        match validate_package_name("   ") {
            Err(PubError::InvalidArgument { field, .. }) => assert_eq!(field, "package_name"),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }
}
