//! Input validation for user-supplied text.

use crate::error::DomainError;

/// Maximum length, in characters, of post and comment content.
pub const MAX_CONTENT_LEN: usize = 1024;

/// Validate post or comment content and return it trimmed.
pub fn validate_content(content: Option<&str>, what: &str) -> Result<String, DomainError> {
    let content = content.map(str::trim).unwrap_or_default();

    if content.is_empty() {
        return Err(DomainError::Validation(format!("{what} content is empty")));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(DomainError::Validation(format!(
            "{what} content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }

    Ok(content.to_string())
}

/// Validate a bounded text field such as a name or a bio.
pub fn validate_length(
    value: &str,
    field: &str,
    min: usize,
    max: usize,
) -> Result<(), DomainError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(DomainError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_content_is_rejected() {
        assert!(matches!(
            validate_content(None, "comment"),
            Err(DomainError::Validation(_))
        ));
        assert!(validate_content(Some("   "), "post").is_err());
    }

    #[test]
    fn test_content_is_trimmed() {
        assert_eq!(validate_content(Some("  hi \n"), "post").unwrap(), "hi");
    }

    #[test]
    fn test_overlong_content_is_rejected() {
        let long = "x".repeat(MAX_CONTENT_LEN + 1);
        assert!(validate_content(Some(&long), "post").is_err());
    }
}
