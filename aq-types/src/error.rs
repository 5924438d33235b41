use std::fmt;

/// A backend payload that does not have the expected shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadError(pub String);

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload error: {}", self.0)
    }
}

impl std::error::Error for PayloadError {}

impl From<aq_utils::error::DateError> for PayloadError {
    fn from(e: aq_utils::error::DateError) -> Self {
        PayloadError(e.to_string())
    }
}
