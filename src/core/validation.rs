//! Prompt schema: the submitted `prompt` field must contain at least one
//! non-whitespace character.

use std::fmt;

/// Name of the only validated form field.
pub const PROMPT_FIELD: &str = "prompt";

const PROMPT_REQUIRED: &str = "Prompt is required.";

/// A field-level rejection, rendered inline under the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a candidate prompt and returns it trimmed.
pub fn validate_prompt(candidate: &str) -> Result<&str, ValidationError> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: PROMPT_FIELD,
            message: PROMPT_REQUIRED.to_string(),
        });
    }
    Ok(trimmed)
}
