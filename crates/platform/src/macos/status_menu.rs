//! Menu-bar status item for the host shell.
//!
//! The item is main-thread state: installed when the shell starts and
//! removed when the application loop ends.

use crate::error::{BridgeError, Result};
use objc2::rc::Retained;
use objc2::{sel, MainThreadMarker};
use objc2_app_kit::{
    NSApplication, NSApplicationActivationPolicy, NSMenu, NSMenuItem, NSStatusBar, NSStatusItem,
};
use objc2_foundation::NSString;
use std::cell::RefCell;
use tracing::{info, warn};

/// `NSVariableStatusItemLength`
const VARIABLE_LENGTH: f64 = -1.0;

thread_local! {
    static STATUS_ITEM: RefCell<Option<Retained<NSStatusItem>>> = const { RefCell::new(None) };
}

/// Install the status item and run the application loop.
///
/// Returns only when the loop stops, or immediately with an error when
/// called off the main thread.
pub fn run_status_menu(title: &str) -> Result<()> {
    let Some(mtm) = MainThreadMarker::new() else {
        warn!("run_status_menu called from non-main thread");
        return Err(BridgeError::Unavailable(
            "status menu must run on the main thread".into(),
        ));
    };

    let app = NSApplication::sharedApplication(mtm);
    app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);
    install(mtm, title);

    info!(title, "Status menu running");
    unsafe { app.run() };

    teardown();
    Ok(())
}

fn install(mtm: MainThreadMarker, title: &str) {
    teardown();

    let status_bar = unsafe { NSStatusBar::systemStatusBar() };
    let item = unsafe { status_bar.statusItemWithLength(VARIABLE_LENGTH) };
    if let Some(button) = item.button(mtm) {
        button.setTitle(&NSString::from_str(title));
    }

    let menu = NSMenu::new(mtm);
    let quit = unsafe {
        NSMenuItem::initWithTitle_action_keyEquivalent(
            mtm.alloc(),
            &NSString::from_str("Quit"),
            Some(sel!(terminate:)),
            &NSString::from_str("q"),
        )
    };
    menu.addItem(&quit);
    item.setMenu(Some(&menu));

    STATUS_ITEM.with(|slot| *slot.borrow_mut() = Some(item));
}

fn teardown() {
    STATUS_ITEM.with(|slot| {
        if let Some(item) = slot.borrow_mut().take() {
            unsafe { NSStatusBar::systemStatusBar().removeStatusItem(&item) };
        }
    });
}
