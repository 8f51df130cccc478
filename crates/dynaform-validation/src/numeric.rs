//! Numeric bound validation for text input holding a number

pub const NOT_A_NUMBER_MESSAGE: &str = "Must be a number.";

/// Parses surrounding-whitespace-tolerant decimal input.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Validates minimum value
pub fn validate_min(s: &str, min: f64) -> Result<(), String> {
    match parse_number(s) {
        Some(n) if n >= min => Ok(()),
        Some(_) => Err(format!("Must be at least {}.", min)),
        None => Err(NOT_A_NUMBER_MESSAGE.to_string()),
    }
}

/// Validates maximum value
pub fn validate_max(s: &str, max: f64) -> Result<(), String> {
    match parse_number(s) {
        Some(n) if n <= max => Ok(()),
        Some(_) => Err(format!("Must be at most {}.", max)),
        None => Err(NOT_A_NUMBER_MESSAGE.to_string()),
    }
}
