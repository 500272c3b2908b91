//! Centralized configuration constants for SStore.
//!
//! Organized by the component that consumes them.

/// Host shell status item.
pub mod menu {
    /// Status item title when none is configured.
    pub const DEFAULT_TITLE: &str = "SStore";
    /// Longer titles are truncated; the menu bar has little room.
    pub const MAX_TITLE_CHARS: usize = 32;
}

/// Authentication-gated vault secret.
pub mod vault {
    /// Prompt text when `vault-reason` is not configured.
    pub const DEFAULT_REASON: &str = "authorize access to vault";
}

/// Bridged waits.
pub mod timing {
    /// Upper clamp for `wait-timeout-secs` (one hour).
    pub const MAX_WAIT_TIMEOUT_SECS: u64 = 60 * 60;
}

/// Logging defaults.
pub mod logging {
    /// Default `EnvFilter` directives.
    pub const DEFAULT_FILTER: &str = "sstore=info,platform=info,warn";
    /// Directives used when `SSTORE_DEBUG` is set.
    pub const DEBUG_FILTER: &str = "sstore=trace,platform=trace,sync_bridge=trace,info";
    /// Environment variable enabling debug logging.
    pub const DEBUG_ENV_VAR: &str = "SSTORE_DEBUG";
}

/// Settings file validation limits.
pub mod settings {
    /// Maximum settings file size in bytes (64 KB).
    /// Settings files should be tiny; anything larger is suspicious.
    pub const MAX_FILE_SIZE: u64 = 64 * 1024;

    /// Environment variable overriding the config file location.
    pub const CONFIG_ENV_VAR: &str = "SSTORE_CONFIG";
}
