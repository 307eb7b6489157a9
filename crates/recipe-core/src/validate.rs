//! Structural checks applied to incoming values before any store access.
//!
//! Names are restricted to ASCII so that case folding is the same in Rust and
//! in SQLite's `lower()`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum length of an ingredient or recipe name.
pub const MAX_LENGTH_NAME: usize = 30;

/// Maximum length of recipe instructions.
pub const MAX_LENGTH_INSTRUCTIONS: usize = 200;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ,.'&()-]*$").expect("name pattern is a valid regex")
});

/// Checks an ingredient or recipe name.
pub fn validate_name(field: &'static str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid(field, "must not be blank"));
    }
    if name.chars().count() > MAX_LENGTH_NAME {
        return Err(CoreError::invalid(
            field,
            format!("must be at most {MAX_LENGTH_NAME} characters"),
        ));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(CoreError::invalid(
            field,
            "may only contain letters, digits, spaces and , . ' & ( ) -",
        ));
    }
    Ok(())
}

/// Checks free-text recipe instructions.
pub fn validate_instructions(instructions: &str) -> Result<(), CoreError> {
    if instructions.trim().is_empty() {
        return Err(CoreError::invalid("instructions", "must not be blank"));
    }
    if instructions.chars().count() > MAX_LENGTH_INSTRUCTIONS {
        return Err(CoreError::invalid(
            "instructions",
            format!("must be at most {MAX_LENGTH_INSTRUCTIONS} characters"),
        ));
    }
    if instructions
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\t')
    {
        return Err(CoreError::invalid(
            "instructions",
            "must not contain control characters",
        ));
    }
    Ok(())
}

/// Checks a serving count.
pub fn validate_servings(number_of_servings: u32) -> Result<(), CoreError> {
    if number_of_servings == 0 {
        return Err(CoreError::invalid("numberOfServings", "must be positive"));
    }
    Ok(())
}
