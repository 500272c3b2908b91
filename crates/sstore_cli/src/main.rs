//! SStore CLI - drives the exported C surface from a terminal.
//!
//! Usage: `sstore-cli <command> [args]`
//!
//! Notifications only work when the binary runs from an app bundle.

use anyhow::{bail, Context, Result};
use sstore::SStoreStatus;
use std::ffi::{c_char, CStr, CString};
use std::ptr;
use std::process::ExitCode;
use tracing::debug;
use zeroize::Zeroizing;

const DEFAULT_REASON: &str = "confirm it's you";

/// Convert a command-line argument into a C string for the exported API.
fn c_arg(value: &str, name: &str) -> Result<CString> {
    CString::new(value).with_context(|| format!("{name} must not contain NUL bytes"))
}

/// Print a status and turn it into the process exit code.
fn report(status: SStoreStatus) -> ExitCode {
    println!("{status:?}");
    ExitCode::from(status as u8)
}

fn authenticate(args: &[String]) -> Result<ExitCode> {
    let reason = c_arg(args.first().map_or(DEFAULT_REASON, String::as_str), "reason")?;
    let status = unsafe { sstore::sstore_authenticate_status(reason.as_ptr()) };
    Ok(report(status))
}

fn get_password(args: &[String]) -> Result<ExitCode> {
    match args {
        [flag, rest @ ..] if flag == "--auth" => get_password_authenticated(rest),
        [service, account] => {
            let service = c_arg(service, "service")?;
            let account = c_arg(account, "account")?;
            let raw =
                unsafe { sstore::get_password_from_keychain(service.as_ptr(), account.as_ptr()) };
            Ok(print_secret(raw))
        }
        _ => bail!("Usage: sstore-cli get [--auth] <service> <account>"),
    }
}

/// `get --auth` with no keys reads the configured vault entry.
fn get_password_authenticated(args: &[String]) -> Result<ExitCode> {
    let raw = match args {
        [] => unsafe {
            sstore::sstore_get_password_authenticated(ptr::null(), ptr::null(), ptr::null())
        },
        [service, account] => {
            let service = c_arg(service, "service")?;
            let account = c_arg(account, "account")?;
            unsafe {
                sstore::sstore_get_password_authenticated(
                    service.as_ptr(),
                    account.as_ptr(),
                    ptr::null(),
                )
            }
        }
        _ => bail!("Usage: sstore-cli get --auth [<service> <account>]"),
    };
    Ok(print_secret(raw))
}

/// Print and release a secret returned by the library.
fn print_secret(raw: *mut c_char) -> ExitCode {
    if raw.is_null() {
        eprintln!("not found");
        return ExitCode::from(SStoreStatus::NotFound as u8);
    }

    let secret = Zeroizing::new(unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned());
    unsafe { sstore::sstore_free_string(raw) };
    println!("{}", secret.as_str());
    ExitCode::SUCCESS
}

fn notify(args: &[String]) -> Result<ExitCode> {
    let [title, body] = args else {
        bail!("Usage: sstore-cli notify <title> <body>");
    };
    let title = c_arg(title, "title")?;
    let body = c_arg(body, "body")?;
    let status = unsafe { sstore::sstore_notify_status(title.as_ptr(), body.as_ptr()) };
    Ok(report(status))
}

fn run(args: &[String]) -> Result<ExitCode> {
    match args.first().map(String::as_str) {
        Some("auth") => authenticate(&args[1..]),
        Some("get") => get_password(&args[1..]),
        Some("notify") => notify(&args[1..]),
        Some("menu") => {
            sstore::run_menu();
            Ok(ExitCode::FAILURE)
        }
        Some("init-config") => {
            let path = settings::ensure_config_file().context("Could not create config file")?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Some(cmd) => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            Ok(ExitCode::from(2))
        }
        None => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_help() {
    println!("SStore CLI");
    println!();
    println!("USAGE:");
    println!("    sstore-cli <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    auth [reason]              Ask the device owner to authenticate");
    println!("    get <service> <account>    Print a generic password from the Keychain");
    println!("    get --auth [<svc> <acct>]  Authenticate first; no keys reads the configured vault");
    println!("    notify <title> <body>      Show a notification");
    println!("    menu                       Run the menu-bar status item");
    println!("    init-config                Write the default config file");
}

fn main() -> ExitCode {
    sstore::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    debug!(?args, "sstore-cli invoked");

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
