//! Centralized validation and helper functions.

use regex::{Regex, RegexBuilder};

/// Maximum number of data rows accepted from a single dump file (DOS protection)
pub const MAX_RECORDS: usize = 1_000_000;

/// Maximum length of a user-supplied filter pattern
pub const MAX_FILTER_PATTERN_LENGTH: usize = 1_024;

/// Upper bound on the compiled size of a filter pattern, in bytes
pub const MAX_FILTER_COMPILED_SIZE: usize = 1 << 20;

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if let Some(msg) = check_record_limit(rows) {
///     return Err(...);
/// }
/// rows += 1; // Safe to add
/// ```
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Input validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filter pattern too long: exceeds {MAX_FILTER_PATTERN_LENGTH} characters")]
    FilterTooLong,
    #[error("Invalid filter pattern: {0}")]
    InvalidFilter(#[from] regex::Error),
}

/// Compile a name filter with bounded length and compiled size.
///
/// Filters are matched against normalized (lowercase) names, so they are
/// compiled case-insensitively.
///
/// # Errors
///
/// Returns `ValidationError::FilterTooLong` if the pattern exceeds the limit,
/// or `ValidationError::InvalidFilter` if it does not compile.
///
/// # Examples
///
/// ```
/// use brew_linker::utils::validation::compile_filter;
///
/// let filter = compile_filter("^great").unwrap();
/// assert!(filter.is_match("great lakes"));
/// assert!(compile_filter("(unclosed").is_err());
/// ```
pub fn compile_filter(pattern: &str) -> Result<Regex, ValidationError> {
    if pattern.len() > MAX_FILTER_PATTERN_LENGTH {
        return Err(ValidationError::FilterTooLong);
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(MAX_FILTER_COMPILED_SIZE)
        .build()?;
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_record_limit() {
        assert!(check_record_limit(100).is_none());
        assert!(check_record_limit(MAX_RECORDS - 1).is_none());
        assert!(check_record_limit(MAX_RECORDS).is_some());
        assert!(check_record_limit(MAX_RECORDS + 1).is_some());
    }

    #[test]
    fn test_compile_filter() {
        let filter = compile_filter("Lakes").unwrap();
        assert!(filter.is_match("great lakes"));
        assert!(!filter.is_match("bells"));
    }

    #[test]
    fn test_compile_filter_too_long() {
        let pattern = "a".repeat(MAX_FILTER_PATTERN_LENGTH + 1);
        assert!(matches!(
            compile_filter(&pattern),
            Err(ValidationError::FilterTooLong)
        ));
    }

    #[test]
    fn test_compile_filter_invalid() {
        assert!(matches!(
            compile_filter("[a-"),
            Err(ValidationError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_compile_filter_size_limit() {
        // Nested repetition blows past the compiled size limit
        assert!(compile_filter(r"\w{1000}{1000}").is_err());
    }
}
