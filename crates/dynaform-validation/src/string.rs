//! String length validation
//!
//! Lengths are counted in characters, not bytes, so "héllo" has length 5.

/// Number of characters in `s`
pub fn char_length(s: &str) -> usize {
    s.chars().count()
}

pub fn validate_min_length(s: &str, min: usize) -> Result<(), String> {
    if char_length(s) >= min {
        Ok(())
    } else {
        Err(format!("Must be at least {} characters long.", min))
    }
}

pub fn validate_max_length(s: &str, max: usize) -> Result<(), String> {
    if char_length(s) <= max {
        Ok(())
    } else {
        Err(format!("Must be at most {} characters long.", max))
    }
}
