//! Outcome of a structural validation.
use std::fmt;

use super::error::Error;

/// Result of validating one BSON buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_position: Option<u64>,
    pub key: Option<String>,
    pub reason: Option<String>,
}

impl ValidationResult {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }
}

impl From<&Error> for ValidationResult {
    fn from(err: &Error) -> Self {
        Self {
            is_valid: false,
            error_position: Some(err.position()),
            key: err.key().map(str::to_owned),
            reason: Some(err.reason()),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return write!(f, "valid");
        }

        write!(
            f,
            "invalid at pos {}, key: {}, reason: {}",
            self.error_position
                .map_or_else(|| "N/A".to_string(), |pos| pos.to_string()),
            self.key.as_deref().unwrap_or("N/A"),
            self.reason.as_deref().unwrap_or("N/A")
        )
    }
}
