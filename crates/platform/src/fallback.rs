//! Fallbacks for platforms without native backends.
//!
//! Authentication and notifications report `Unavailable` without blocking;
//! the credential store never finds anything.

use crate::authenticator::{AuthPolicy, PolicyEvaluator};
use crate::error::{BridgeError, Result};
use crate::notifications::{NotificationCenter, NotificationRequest, PermissionState};
use crate::secure_store::{CredentialKey, SecretStore};
use sync_bridge::Completer;
use tracing::debug;
use zeroize::Zeroizing;

const REASON: &str = "not supported on this platform";

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedEvaluator;

impl PolicyEvaluator for UnsupportedEvaluator {
    fn can_evaluate(&self, _policy: AuthPolicy) -> Result<()> {
        Err(BridgeError::Unavailable(REASON.into()))
    }

    fn evaluate(&self, _policy: AuthPolicy, _reason: &str, reply: Completer<Result<()>>) {
        reply.complete(Err(BridgeError::Unavailable(REASON.into())));
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedStore;

impl SecretStore for UnsupportedStore {
    fn copy_matching(&self, _key: &CredentialKey) -> Result<Zeroizing<Vec<u8>>> {
        Err(BridgeError::Unavailable(REASON.into()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedNotificationCenter;

impl UnsupportedNotificationCenter {
    pub fn with_sound(_sound: bool) -> Self {
        Self
    }
}

impl NotificationCenter for UnsupportedNotificationCenter {
    fn request_permission(&self, reply: Completer<Result<PermissionState>>) {
        reply.complete(Ok(PermissionState::Denied));
    }

    fn schedule(&self, request: NotificationRequest) {
        debug!(id = %request.id(), "Dropping notification on unsupported platform");
    }
}

pub fn run_status_menu(_title: &str) -> Result<()> {
    Err(BridgeError::Unavailable(REASON.into()))
}
