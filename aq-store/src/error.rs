use aq_types::error::PayloadError;
use std::fmt;
use std::time::Duration;

/// Broad class of a fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connectivity problem or timeout. Worth retrying.
    Transport,
    /// The backend answered with something we cannot use. Not retried.
    Schema,
    /// The backend as a whole is down.
    BackendUnavailable,
}

/// Why a slot's fetch failed. Stored on the slot, never thrown.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    Transport { message: String },
    Timeout { after: Duration },
    Schema { message: String },
    BackendUnavailable,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        FetchError::Transport {
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        FetchError::Schema {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Transport { .. } | FetchError::Timeout { .. } => ErrorKind::Transport,
            FetchError::Schema { .. } => ErrorKind::Schema,
            FetchError::BackendUnavailable => ErrorKind::BackendUnavailable,
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Schema)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport { message } => write!(f, "Transport error: {}", message),
            FetchError::Timeout { after } => {
                write!(f, "Transport error: no response after {} ms", after.as_millis())
            }
            FetchError::Schema { message } => write!(f, "Schema error: {}", message),
            FetchError::BackendUnavailable => write!(f, "Backend unavailable"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<PayloadError> for FetchError {
    fn from(e: PayloadError) -> Self {
        FetchError::Schema { message: e.0 }
    }
}
