//! Transient user notifications.
//!
//! Permission is requested on every call and bridged to a blocking answer.
//! Scheduling is fire-and-forget: `notify` succeeding means delivery was
//! requested, not that the banner was shown.

use crate::error::{BridgeError, Result};
use std::time::Duration;
use sync_bridge::{block_on_timeout, Completer};
use tracing::{debug, info};
use uuid::Uuid;

/// One notification, identified by a fresh v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    id: Uuid,
    title: String,
    body: String,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
}

/// Seam over the platform notification center.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationCenter: Send + Sync {
    /// Ask for alert permission. `reply` receives the answer exactly once.
    fn request_permission(&self, reply: Completer<Result<PermissionState>>);

    /// Queue immediate one-shot delivery. Failures are logged, not returned.
    fn schedule(&self, request: NotificationRequest);
}

/// Notification delivery is tied to the identity of an app bundle. A process
/// without one must not reach the native center.
pub fn require_app_bundle(bundle_identifier: Option<&str>) -> Result<()> {
    match bundle_identifier {
        Some(identifier) if !identifier.trim().is_empty() => Ok(()),
        _ => Err(BridgeError::Unavailable(
            "notifications require an app bundle".into(),
        )),
    }
}

pub struct NotificationDispatcher<C> {
    center: C,
    timeout: Option<Duration>,
}

impl<C: NotificationCenter> NotificationDispatcher<C> {
    pub fn new(center: C) -> Self {
        Self {
            center,
            timeout: None,
        }
    }

    /// `None` waits for the permission answer indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the identifier of the scheduled notification.
    pub fn notify(&self, title: &str, body: &str) -> Result<Uuid> {
        crate::note_blocking_wait("notify");
        let permission =
            block_on_timeout(|reply| self.center.request_permission(reply), self.timeout)??;

        if permission == PermissionState::Denied {
            info!("Notification permission denied, nothing scheduled");
            return Err(BridgeError::Denied);
        }

        let request = NotificationRequest::new(title, body);
        let id = request.id();
        debug!(%id, title, "Scheduling notification");
        self.center.schedule(request);
        Ok(id)
    }
}
