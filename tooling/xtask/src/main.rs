//! SStore build automation tasks.
//!
//! Usage: `cargo xtask <command>`

use std::env;
use std::fs;
use std::path::Path;

/// C declarations for everything `crates/sstore` exports.
const HEADER: &str = r#"/* Generated by `cargo xtask header`. Do not edit. */
#ifndef SSTORE_H
#define SSTORE_H

#include <stdbool.h>
#include <stdint.h>

#ifdef __cplusplus
extern "C" {
#endif

typedef enum {
    SSTORE_OK = 0,
    SSTORE_DENIED = 1,
    SSTORE_UNAVAILABLE = 2,
    SSTORE_NOT_FOUND = 3,
    SSTORE_PLATFORM_ERROR = 4,
    SSTORE_TIMED_OUT = 5,
    SSTORE_INVALID_ARGUMENT = 6,
} sstore_status_t;

/* Blocks until the prompt resolves. True only when the device owner was verified. */
bool authenticate_with_touch_id(const char *reason);
int32_t sstore_authenticate_status(const char *reason);

/* Returns NULL when not found. Release a non-NULL result with sstore_free_string. */
char *get_password_from_keychain(const char *service, const char *account);

/* Authenticates first; the Keychain is only read after the owner is verified.
 * NULL service and account select the configured vault entry; NULL reason uses
 * the configured prompt. */
char *sstore_get_password_authenticated(const char *service, const char *account,
                                        const char *reason);
void sstore_free_string(char *secret);

/* True means delivery was requested after permission was granted. */
bool show_toast_notification(const char *title, const char *body);
int32_t sstore_notify_status(const char *title, const char *body);

/* Main thread only. Runs the menu-bar status item; does not return. */
void run_menu(void);

#ifdef __cplusplus
}
#endif

#endif /* SSTORE_H */
"#;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(|s| s.as_str()) {
        Some("header") => match args.get(1) {
            Some(path) => write_header(Path::new(path)),
            None => print!("{HEADER}"),
        },
        Some(cmd) => {
            eprintln!("Unknown command: {cmd}");
            print_help();
        }
        None => print_help(),
    }
}

fn write_header(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Failed to create {}: {e}", parent.display());
            return;
        }
    }
    match fs::write(path, HEADER) {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => eprintln!("Failed to write {}: {e}", path.display()),
    }
}

fn print_help() {
    println!("SStore xtask");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    header [path]    Print the C header, or write it to <path>");
}
