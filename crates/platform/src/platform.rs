//! Platform-native integrations behind small trait seams.
//!
//! Provides device-owner authentication, credential-store lookup (plain or
//! gated behind authentication), user notifications and the status-bar host
//! shell. The native backends live in `macos`; other platforms get fallbacks
//! that report `Unavailable`.

pub mod authenticator;
pub mod error;
pub mod notifications;
pub mod secure_store;
pub mod vault;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(not(target_os = "macos"))]
mod fallback;

pub use authenticator::{AuthPolicy, AuthRequest, AuthResult, AuthState, Authenticator, PolicyEvaluator};
pub use error::{BridgeError, Result};
pub use notifications::{
    require_app_bundle, NotificationCenter, NotificationDispatcher, NotificationRequest,
    PermissionState,
};
pub use secure_store::{CredentialKey, CredentialLookup, SecretStore, SecureStoreAdapter};
pub use vault::GatedCredential;

// Native backends for the current target
#[cfg(target_os = "macos")]
pub use macos::{
    run_status_menu, KeychainStore as NativeSecretStore,
    LocalAuthEvaluator as NativePolicyEvaluator,
    UserNotificationCenter as NativeNotificationCenter,
};

#[cfg(not(target_os = "macos"))]
pub use fallback::{
    run_status_menu, UnsupportedEvaluator as NativePolicyEvaluator,
    UnsupportedNotificationCenter as NativeNotificationCenter,
    UnsupportedStore as NativeSecretStore,
};

/// Warn when a bridged wait is about to block the main thread.
///
/// A completion scheduled onto the main queue could never run while the
/// main thread sits in the wait.
#[cfg(target_os = "macos")]
pub(crate) fn note_blocking_wait(operation: &str) {
    if objc2::MainThreadMarker::new().is_some() {
        tracing::warn!(operation, "Blocking on the main thread while waiting for the platform");
    }
}

#[cfg(not(target_os = "macos"))]
pub(crate) fn note_blocking_wait(_operation: &str) {}
