//! Shared utilities for SStore.

use std::fmt::Display;

/// Log-and-discard helpers for results whose error only matters as a diagnostic.
pub trait ResultExt<E> {
    type Ok;

    /// Log the error at `error` level and return `None`.
    fn log_err(self) -> Option<Self::Ok>;

    /// Log the error at `warn` level and return `None`.
    fn warn_on_err(self) -> Option<Self::Ok>;
}

impl<T, E: Display> ResultExt<E> for Result<T, E> {
    type Ok = T;

    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                tracing::error!("{}:{}: {}", caller.file(), caller.line(), error);
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                tracing::warn!("{}:{}: {}", caller.file(), caller.line(), error);
                None
            }
        }
    }
}
