//! Presence validation

/// Default message for a missing value
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Rejects absent values and empty strings.
///
/// `None` stands for a value that was never supplied.
pub fn validate_required(value: Option<&str>) -> Result<(), String> {
    match value {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(REQUIRED_MESSAGE.to_string()),
    }
}
