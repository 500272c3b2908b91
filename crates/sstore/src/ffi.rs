//! Exported `extern "C"` functions.
//!
//! Pointer arguments must be null or point to NUL-terminated strings that
//! stay valid for the duration of the call. Null is treated as a failed call.

use crate::context::bridge;
use crate::SStoreStatus;
use platform::{CredentialKey, GatedCredential};
use std::borrow::Cow;
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use tracing::{debug, error, warn};
use util::ResultExt;
use zeroize::{Zeroize, Zeroizing};

/// Run `body`, turning a panic into `fallback` so nothing unwinds into the host.
fn guarded<T>(operation: &'static str, fallback: T, body: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(_) => {
            error!(operation, "Panic caught at the FFI boundary");
            fallback
        }
    }
}

/// Display text (reason, title, body). Invalid UTF-8 is replaced, not rejected.
unsafe fn text_arg<'a>(ptr: *const c_char, name: &'static str) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        warn!(argument = name, "Null pointer passed across the FFI boundary");
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy())
}

/// Lookup keys must match exactly, so they must be valid UTF-8.
unsafe fn key_arg<'a>(ptr: *const c_char, name: &'static str) -> Option<&'a str> {
    if ptr.is_null() {
        warn!(argument = name, "Null pointer passed across the FFI boundary");
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().warn_on_err()
}

/// Hand a secret to the caller as an owned C string.
///
/// A secret with an interior NUL cannot be represented and reads as not found.
fn secret_into_raw(mut secret: Zeroizing<String>) -> *mut c_char {
    let bytes = std::mem::take(&mut *secret).into_bytes();
    match CString::new(bytes) {
        Ok(secret) => secret.into_raw(),
        Err(err) => {
            warn!("Stored secret contains a NUL byte; reporting not found");
            err.into_vec().zeroize();
            ptr::null_mut()
        }
    }
}

/// Ask the device owner to authenticate, showing `reason` in the prompt.
///
/// Returns true only when the user was verified. Blocks until the prompt
/// resolves.
///
/// # Safety
///
/// `reason` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn authenticate_with_touch_id(reason: *const c_char) -> bool {
    guarded("authenticate", false, || {
        let Some(reason) = (unsafe { text_arg(reason, "reason") }) else {
            return false;
        };
        bridge().authenticator.authenticate(&reason).is_granted()
    })
}

/// Like `authenticate_with_touch_id`, reporting why it failed.
///
/// # Safety
///
/// `reason` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn sstore_authenticate_status(reason: *const c_char) -> SStoreStatus {
    guarded("authenticate", SStoreStatus::PlatformError, || {
        let Some(reason) = (unsafe { text_arg(reason, "reason") }) else {
            return SStoreStatus::InvalidArgument;
        };
        SStoreStatus::from(&bridge().authenticator.authenticate_detailed(&reason))
    })
}

/// Look up the generic password stored for `service` and `account`.
///
/// Returns null when there is no such item, access failed, or the secret is
/// not text. A non-null result is owned by the caller and must be released
/// with `sstore_free_string`.
///
/// # Safety
///
/// `service` and `account` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn get_password_from_keychain(
    service: *const c_char,
    account: *const c_char,
) -> *mut c_char {
    guarded("get_password", ptr::null_mut(), || {
        let service = unsafe { key_arg(service, "service") };
        let account = unsafe { key_arg(account, "account") };
        let (Some(service), Some(account)) = (service, account) else {
            return ptr::null_mut();
        };

        let key = CredentialKey::new(service, account);
        match bridge().store.lookup_secret(&key).into_secret() {
            Some(secret) => {
                debug!(service, account, "Returning secret to caller");
                secret_into_raw(secret)
            }
            None => ptr::null_mut(),
        }
    })
}

/// Resolve the arguments of `sstore_get_password_authenticated`.
unsafe fn gated_credential(
    service: *const c_char,
    account: *const c_char,
    reason: *const c_char,
) -> Option<GatedCredential> {
    let config = &bridge().config;
    let reason = if reason.is_null() {
        config.vault_reason().to_owned()
    } else {
        unsafe { text_arg(reason, "reason") }?.into_owned()
    };

    if service.is_null() && account.is_null() {
        let Some(configured) = config.vault_credential() else {
            warn!("No vault-service and vault-account configured");
            return None;
        };
        return Some(GatedCredential::new(configured.key().clone(), reason));
    }

    let service = unsafe { key_arg(service, "service") }?;
    let account = unsafe { key_arg(account, "account") }?;
    Some(GatedCredential::new(CredentialKey::new(service, account), reason))
}

/// Verify the device owner, then look up a generic password.
///
/// Passing null for both `service` and `account` selects the configured
/// vault entry; a null `reason` uses the configured prompt. The store is only
/// queried after authentication succeeds. Returns null on any failure; a
/// non-null result must be released with `sstore_free_string`.
///
/// # Safety
///
/// Every argument must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn sstore_get_password_authenticated(
    service: *const c_char,
    account: *const c_char,
    reason: *const c_char,
) -> *mut c_char {
    guarded("get_password_authenticated", ptr::null_mut(), || {
        let Some(credential) = (unsafe { gated_credential(service, account, reason) }) else {
            return ptr::null_mut();
        };

        let bridge = bridge();
        match credential.acquire(&bridge.authenticator, &bridge.store) {
            Ok(secret) => {
                debug!(service = %credential.key().service, "Returning gated secret to caller");
                secret_into_raw(secret)
            }
            Err(err) => {
                debug!(service = %credential.key().service, error = %err, "Gated secret withheld");
                ptr::null_mut()
            }
        }
    })
}

/// Wipe and free a string returned by `get_password_from_keychain` or
/// `sstore_get_password_authenticated`. Null is ignored.
///
/// # Safety
///
/// `secret` must be null or a pointer obtained from this library that has
/// not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn sstore_free_string(secret: *mut c_char) {
    if secret.is_null() {
        return;
    }
    let secret = unsafe { CString::from_raw(secret) };
    secret.into_bytes_with_nul().zeroize();
}

/// Show a notification after asking for permission.
///
/// True means delivery was requested; the banner itself is not confirmed.
///
/// # Safety
///
/// `title` and `body` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn show_toast_notification(title: *const c_char, body: *const c_char) -> bool {
    unsafe { sstore_notify_status(title, body) == SStoreStatus::Ok }
}

/// Like `show_toast_notification`, reporting why nothing was scheduled.
///
/// # Safety
///
/// `title` and `body` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn sstore_notify_status(
    title: *const c_char,
    body: *const c_char,
) -> SStoreStatus {
    guarded("notify", SStoreStatus::PlatformError, || {
        let title = unsafe { text_arg(title, "title") };
        let body = unsafe { text_arg(body, "body") };
        let (Some(title), Some(body)) = (title, body) else {
            return SStoreStatus::InvalidArgument;
        };
        SStoreStatus::from(&bridge().notifier.notify(&title, &body))
    })
}

/// Start the menu-bar host shell. Call from the main thread.
///
/// On macOS this runs the application loop and only returns if the shell
/// could not start. Elsewhere it parks the calling thread forever.
#[no_mangle]
pub extern "C" fn run_menu() {
    guarded("run_menu", (), || {
        let title = bridge().config.menu_title();
        platform::run_status_menu(&title).log_err();
    });

    #[cfg(not(target_os = "macos"))]
    park_forever();
}

#[cfg(not(target_os = "macos"))]
fn park_forever() -> ! {
    tracing::info!("No status menu on this platform; parking the calling thread");
    loop {
        std::thread::park();
    }
}
