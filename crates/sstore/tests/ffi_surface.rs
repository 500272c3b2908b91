//! Exercises the exported C surface the way a host process calls it.
//!
//! Only runs where no native backend exists, so nothing prompts the user
//! and no real keychain is touched.

#![cfg(not(target_os = "macos"))]

use sstore::{
    authenticate_with_touch_id, get_password_from_keychain, show_toast_notification,
    sstore_authenticate_status, sstore_free_string, sstore_get_password_authenticated,
    sstore_notify_status, SStoreStatus,
};
use std::ptr;
use std::time::{Duration, Instant};

#[test]
fn authentication_fails_fast_without_biometrics() {
    let started = Instant::now();
    let granted = unsafe { authenticate_with_touch_id(c"unlock vault".as_ptr()) };
    assert!(!granted);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn authentication_status_reports_unavailable() {
    let status = unsafe { sstore_authenticate_status(c"unlock vault".as_ptr()) };
    assert_eq!(status, SStoreStatus::Unavailable);
}

#[test]
fn null_reason_is_rejected() {
    assert!(!unsafe { authenticate_with_touch_id(ptr::null()) });
    assert_eq!(
        unsafe { sstore_authenticate_status(ptr::null()) },
        SStoreStatus::InvalidArgument
    );
}

#[test]
fn missing_secret_returns_null_every_time() {
    for _ in 0..2 {
        let secret = unsafe {
            get_password_from_keychain(c"com.example.app".as_ptr(), c"alice".as_ptr())
        };
        assert!(secret.is_null());
        unsafe { sstore_free_string(secret) };
    }
}

#[test]
fn null_keys_return_null() {
    assert!(unsafe { get_password_from_keychain(ptr::null(), c"alice".as_ptr()) }.is_null());
    assert!(
        unsafe { get_password_from_keychain(c"com.example.app".as_ptr(), ptr::null()) }.is_null()
    );
}

#[test]
fn gated_secret_is_withheld_without_authentication() {
    let started = Instant::now();
    let secret = unsafe {
        sstore_get_password_authenticated(
            c"com.example.myapp".as_ptr(),
            c"myusername".as_ptr(),
            c"authorize access to vault".as_ptr(),
        )
    };
    assert!(secret.is_null());
    assert!(started.elapsed() < Duration::from_secs(1));

    let with_default_reason = unsafe {
        sstore_get_password_authenticated(
            c"com.example.myapp".as_ptr(),
            c"myusername".as_ptr(),
            ptr::null(),
        )
    };
    assert!(with_default_reason.is_null());
}

#[test]
fn gated_secret_needs_both_keys_or_neither() {
    assert!(unsafe {
        sstore_get_password_authenticated(c"com.example.myapp".as_ptr(), ptr::null(), ptr::null())
    }
    .is_null());
}

#[test]
fn notification_without_permission_returns_false() {
    let shown = unsafe {
        show_toast_notification(c"Sync complete".as_ptr(), c"All files uploaded".as_ptr())
    };
    assert!(!shown);
    assert_eq!(
        unsafe { sstore_notify_status(c"Sync complete".as_ptr(), c"All files uploaded".as_ptr()) },
        SStoreStatus::Denied
    );
}

#[test]
fn null_notification_text_is_rejected() {
    assert_eq!(
        unsafe { sstore_notify_status(ptr::null(), c"body".as_ptr()) },
        SStoreStatus::InvalidArgument
    );
    assert!(!unsafe { show_toast_notification(c"title".as_ptr(), ptr::null()) });
}
