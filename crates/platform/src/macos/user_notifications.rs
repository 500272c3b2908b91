//! UserNotifications (`UNUserNotificationCenter`) backend.
//!
//! Only works for processes running from an app bundle. The notification
//! center raises an Objective-C exception when asked for without one, so
//! the bundle is checked first and its absence reported as `Unavailable`.

use crate::error::{BridgeError, Result};
use crate::notifications::{
    require_app_bundle, NotificationCenter, NotificationRequest, PermissionState,
};
use block2::RcBlock;
use objc2::runtime::Bool;
use objc2_foundation::{NSBundle, NSError, NSString};
use objc2_user_notifications::{
    UNAuthorizationOptions, UNMutableNotificationContent, UNNotificationRequest,
    UNNotificationSound, UNUserNotificationCenter,
};
use sync_bridge::Completer;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct UserNotificationCenter {
    sound: bool,
}

impl UserNotificationCenter {
    pub fn with_sound(sound: bool) -> Self {
        Self { sound }
    }
}

fn main_bundle_identifier() -> Option<String> {
    let bundle = unsafe { NSBundle::mainBundle() };
    unsafe { bundle.bundleIdentifier() }.map(|identifier| identifier.to_string())
}

impl NotificationCenter for UserNotificationCenter {
    fn request_permission(&self, reply: Completer<Result<PermissionState>>) {
        if let Err(err) = require_app_bundle(main_bundle_identifier().as_deref()) {
            warn!(error = %err, "Not asking for notification permission");
            reply.complete(Err(err));
            return;
        }

        let center = unsafe { UNUserNotificationCenter::currentNotificationCenter() };
        let options = UNAuthorizationOptions::Alert | UNAuthorizationOptions::Sound;

        let block = RcBlock::new(move |granted: Bool, error: *mut NSError| {
            let answer = match unsafe { error.as_ref() } {
                Some(error) => {
                    let (code, message) = super::describe(error);
                    Err(BridgeError::platform(code, message))
                }
                None if granted.as_bool() => Ok(PermissionState::Granted),
                None => Ok(PermissionState::Denied),
            };
            debug!(?answer, "Notification permission answered");
            reply.complete(answer);
        });

        unsafe { center.requestAuthorizationWithOptions_completionHandler(options, &block) };
    }

    fn schedule(&self, request: NotificationRequest) {
        if let Err(err) = require_app_bundle(main_bundle_identifier().as_deref()) {
            warn!(id = %request.id(), error = %err, "Dropping notification");
            return;
        }

        let center = unsafe { UNUserNotificationCenter::currentNotificationCenter() };

        let content = unsafe { UNMutableNotificationContent::new() };
        unsafe {
            content.setTitle(&NSString::from_str(request.title()));
            content.setBody(&NSString::from_str(request.body()));
            if self.sound {
                content.setSound(Some(&UNNotificationSound::defaultSound()));
            }
        }

        // No trigger: deliver once, immediately.
        let identifier = NSString::from_str(&request.id().to_string());
        let native_request = unsafe {
            UNNotificationRequest::requestWithIdentifier_content_trigger(&identifier, &content, None)
        };

        let id = request.id();
        let handler = RcBlock::new(move |error: *mut NSError| match unsafe { error.as_ref() } {
            Some(error) => {
                let (code, message) = super::describe(error);
                warn!(%id, code, %message, "Notification delivery failed");
            }
            None => debug!(%id, "Notification queued for delivery"),
        });

        unsafe { center.addNotificationRequest_withCompletionHandler(&native_request, Some(&handler)) };
    }
}
