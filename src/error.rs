//! Error types.

use alloc::string::{String, ToString};

/// Failure reported by a [`Platform`](crate::Platform) implementation.
///
/// The engine never recovers from these; they abort the computation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("platform error: {message}")]
pub struct PlatformError {
    message: String,
}

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Position computation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// A platform measurement failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),
    /// Middleware kept requesting resets past the configured limit.
    #[error("middleware `{middleware}` requested a reset after {limit} resets")]
    ResetLimitExceeded {
        /// The configured maximum number of resets.
        limit: usize,
        /// Name of the middleware whose reset crossed the limit.
        middleware: String,
    },
}

/// A string that is not one of the 12 placement names.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid placement `{input}`")]
pub struct ParsePlacementError {
    input: String,
}

impl ParsePlacementError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}
