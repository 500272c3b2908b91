//! Failure kinds shared by the leaf components.

use sync_bridge::WaitError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The capability is not present in this device or OS configuration.
    #[error("unavailable: {0}")]
    Unavailable(String),
    /// The user declined or cancelled.
    #[error("denied by user")]
    Denied,
    /// No credential for the key, or its bytes are not text.
    #[error("credential not found")]
    NotFound,
    #[error("platform error {code}: {message}")]
    Platform { code: i64, message: String },
    #[error("timed out waiting for the platform")]
    TimedOut,
    /// The platform released its completion handler without calling it.
    #[error("platform abandoned the request")]
    Abandoned,
}

impl BridgeError {
    pub fn platform(code: impl Into<i64>, message: impl Into<String>) -> Self {
        Self::Platform {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<WaitError> for BridgeError {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::TimedOut(_) => Self::TimedOut,
            WaitError::Abandoned => Self::Abandoned,
        }
    }
}
