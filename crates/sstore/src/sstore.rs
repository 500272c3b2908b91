//! C ABI for device-owner authentication, Keychain lookup and notifications.
//!
//! Every export blocks the calling thread until the platform answers and
//! reports failure as `false` or null. The richer `sstore_*_status` exports
//! return an [`SStoreStatus`] code instead.
//!
//! # Ownership
//!
//! `get_password_from_keychain` and `sstore_get_password_authenticated` return
//! a buffer owned by the caller. It must be released with `sstore_free_string`,
//! which wipes it before freeing. Do not pass it to `free(3)`.
//!
//! # Blocking
//!
//! No wait is bounded unless `wait-timeout-secs` is set in the config file. A
//! platform that never answers keeps the calling thread blocked. Do not call
//! the blocking exports from the main thread of an AppKit application.

mod context;
pub mod ffi;
mod logging;
mod status;

pub use ffi::{
    authenticate_with_touch_id, get_password_from_keychain, run_menu, show_toast_notification,
    sstore_authenticate_status, sstore_free_string, sstore_get_password_authenticated,
    sstore_notify_status,
};
pub use status::SStoreStatus;

/// Load the config and install logging ahead of the first exported call.
pub fn init() {
    context::bridge();
}
