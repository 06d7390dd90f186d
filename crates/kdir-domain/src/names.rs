//! Validation for strings that end up as path segments.

/// A name or key that cannot be used as a single path segment.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NameError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} '{value}' must not contain a path separator")]
    Separator { field: &'static str, value: String },
    #[error("{field} '{value}' is not a usable path segment")]
    Relative { field: &'static str, value: String },
}

/// Checks that `value` can be joined onto a directory as exactly one component.
pub fn validate_segment(field: &'static str, value: &str) -> Result<(), NameError> {
    if value.is_empty() {
        return Err(NameError::Empty { field });
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(NameError::Separator {
            field,
            value: value.to_string(),
        });
    }
    if value == "." || value == ".." {
        return Err(NameError::Relative {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Data keys follow the same rule as names: one key, one file.
pub fn validate_key(key: &str) -> Result<(), NameError> {
    validate_segment("key", key)
}
