//! macOS-specific native integrations via Objective-C FFI.

mod keychain;
mod local_auth;
mod status_menu;
mod user_notifications;

pub use keychain::KeychainStore;
pub use local_auth::LocalAuthEvaluator;
pub use status_menu::run_status_menu;
pub use user_notifications::UserNotificationCenter;

use objc2_foundation::NSError;

/// Code and localized description of an `NSError`.
fn describe(error: &NSError) -> (i64, String) {
    (error.code() as i64, error.localizedDescription().to_string())
}
