use platform::BridgeError;

/// Result code returned by the `sstore_*_status` exports.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SStoreStatus {
    Ok = 0,
    Denied = 1,
    Unavailable = 2,
    NotFound = 3,
    PlatformError = 4,
    TimedOut = 5,
    InvalidArgument = 6,
}

impl From<&BridgeError> for SStoreStatus {
    fn from(err: &BridgeError) -> Self {
        match err {
            BridgeError::Denied => Self::Denied,
            BridgeError::Unavailable(_) => Self::Unavailable,
            BridgeError::NotFound => Self::NotFound,
            BridgeError::TimedOut => Self::TimedOut,
            BridgeError::Platform { .. } | BridgeError::Abandoned => Self::PlatformError,
        }
    }
}

impl<T> From<&platform::Result<T>> for SStoreStatus {
    fn from(result: &platform::Result<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(err) => err.into(),
        }
    }
}
