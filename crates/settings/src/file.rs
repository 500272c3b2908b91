//! TOML config file support.
//!
//! Config location: `~/.config/sstore/config.toml`, or the path in `SSTORE_CONFIG`.
//! The file is read once when the bridge starts; there is no live reload.

use crate::constants;
use platform::{AuthPolicy, CredentialKey, GatedCredential};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User-facing config parsed from TOML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Which credentials may satisfy an authentication prompt.
    pub auth_policy: AuthPolicy,
    /// Upper bound on every bridged wait. Absent or zero waits forever.
    pub wait_timeout_secs: Option<u64>,
    /// Play the default sound with notifications.
    pub notification_sound: bool,
    /// Status item title.
    pub menu_title: String,
    /// Default `EnvFilter` directives (`RUST_LOG` still wins).
    pub log_filter: Option<String>,
    /// Keychain service of the secret released after authentication.
    pub vault_service: Option<String>,
    /// Keychain account of the secret released after authentication.
    pub vault_account: Option<String>,
    /// Prompt text shown before releasing the vault secret.
    pub vault_reason: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_policy: AuthPolicy::default(),
            wait_timeout_secs: None,
            notification_sound: false,
            menu_title: constants::menu::DEFAULT_TITLE.to_string(),
            log_filter: None,
            vault_service: None,
            vault_account: None,
            vault_reason: constants::vault::DEFAULT_REASON.to_string(),
        }
    }
}

/// Non-blank trimmed value.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    /// The configured wait bound, clamped to one hour.
    pub fn wait_timeout(&self) -> Option<Duration> {
        match self.wait_timeout_secs {
            None | Some(0) => None,
            Some(secs) => Some(Duration::from_secs(
                secs.min(constants::timing::MAX_WAIT_TIMEOUT_SECS),
            )),
        }
    }

    /// Trimmed and length-limited title, falling back to the default when blank.
    pub fn menu_title(&self) -> String {
        let title = self.menu_title.trim();
        if title.is_empty() {
            return constants::menu::DEFAULT_TITLE.to_string();
        }
        title
            .chars()
            .take(constants::menu::MAX_TITLE_CHARS)
            .collect()
    }

    /// Prompt text for the vault secret, falling back to the default when blank.
    pub fn vault_reason(&self) -> &str {
        non_blank(Some(self.vault_reason.as_str())).unwrap_or(constants::vault::DEFAULT_REASON)
    }

    /// The configured vault entry, when both service and account are set.
    pub fn vault_credential(&self) -> Option<GatedCredential> {
        let service = non_blank(self.vault_service.as_deref())?;
        let account = non_blank(self.vault_account.as_deref())?;
        Some(GatedCredential::new(
            CredentialKey::new(service, account),
            self.vault_reason(),
        ))
    }
}

/// Default config file content with comments (generated on first launch).
const DEFAULT_CONFIG: &str = r#"# SStore Configuration
# Read once when the library is first used.

# Who may satisfy an authentication prompt:
#   "device-owner" - Touch ID, falling back to the account password
#   "biometrics"   - Touch ID only
auth-policy = "device-owner"

# Give up on a pending prompt or permission request after this many seconds.
# Leave unset to wait for as long as the system takes.
# wait-timeout-secs = 120

# Play the default sound with notifications
notification-sound = false

# Menu-bar status item title
menu-title = "SStore"

# Default log filter (RUST_LOG overrides it)
# log-filter = "sstore=debug,warn"

# Keychain item released only after the device owner authenticates
# (`sstore-cli get --auth`, `sstore_get_password_authenticated`)
# vault-service = "com.example.myapp"
# vault-account = "myusername"
vault-reason = "authorize access to vault"
"#;

/// Return the config file path, honouring `SSTORE_CONFIG`.
pub fn config_path() -> PathBuf {
    match std::env::var_os(constants::settings::CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => sstore_paths::config_file(),
    }
}

/// Ensure the config file exists, creating a default if missing.
/// Returns the path to the config file.
pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path();
    if !path.exists() {
        let parent = path.parent()?;
        std::fs::create_dir_all(parent).ok()?;
        std::fs::write(&path, DEFAULT_CONFIG).ok()?;
        tracing::info!("Created default config at {:?}", path);
    }
    Some(path)
}

/// Load and parse the config file. Returns default on any error.
pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// Load and parse a specific config file. Returns default on any error.
pub fn load_config_from(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config: {}", e);
            }
            return Config::default();
        }
    };

    // Size guard
    if content.len() > constants::settings::MAX_FILE_SIZE as usize {
        tracing::warn!(
            "Config file too large ({} bytes), using defaults",
            content.len()
        );
        return Config::default();
    }

    match toml::from_str(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("Failed to parse config.toml: {}", e);
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn default_config_has_sane_values() {
        let cfg = Config::default();
        assert_eq!(cfg.auth_policy, AuthPolicy::DeviceOwner);
        assert_eq!(cfg.wait_timeout(), None);
        assert!(!cfg.notification_sound);
        assert_eq!(cfg.menu_title(), "SStore");
        assert!(cfg.log_filter.is_none());
        assert!(cfg.vault_credential().is_none());
        assert_eq!(cfg.vault_reason, "authorize access to vault");
    }

    #[test]
    fn default_config_file_parses_to_defaults() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_full_toml() {
        let toml_str = r#"
            auth-policy = "biometrics"
            wait-timeout-secs = 30
            notification-sound = true
            menu-title = "Vault"
            log-filter = "sstore=debug"
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.auth_policy, AuthPolicy::Biometrics);
        assert_eq!(cfg.wait_timeout(), Some(Duration::from_secs(30)));
        assert!(cfg.notification_sound);
        assert_eq!(cfg.menu_title(), "Vault");
        assert_eq!(cfg.log_filter.as_deref(), Some("sstore=debug"));
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        let cfg: Config = toml::from_str("wait-timeout-secs = 0").unwrap();
        assert_eq!(cfg.wait_timeout(), None);
    }

    #[test]
    fn huge_timeout_is_clamped() {
        let cfg: Config = toml::from_str("wait-timeout-secs = 999999999").unwrap();
        assert_eq!(
            cfg.wait_timeout(),
            Some(Duration::from_secs(constants::timing::MAX_WAIT_TIMEOUT_SECS))
        );
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        assert!(toml::from_str::<Config>(r#"auth-policy = "retina""#).is_err());
    }

    #[test]
    fn blank_title_falls_back_and_long_title_is_truncated() {
        let blank = Config {
            menu_title: "   ".into(),
            ..Config::default()
        };
        assert_eq!(blank.menu_title(), "SStore");

        let long = Config {
            menu_title: "x".repeat(100),
            ..Config::default()
        };
        assert_eq!(
            long.menu_title().chars().count(),
            constants::menu::MAX_TITLE_CHARS
        );
    }

    #[test]
    fn vault_credential_needs_service_and_account() {
        assert!(Config::default().vault_credential().is_none());

        let only_service: Config = toml::from_str(r#"vault-service = "com.example.myapp""#).unwrap();
        assert!(only_service.vault_credential().is_none());

        let blank: Config = toml::from_str(
            r#"
            vault-service = "  "
            vault-account = "myusername"
        "#,
        )
        .unwrap();
        assert!(blank.vault_credential().is_none());
    }

    #[test]
    fn vault_credential_from_toml() {
        let cfg: Config = toml::from_str(
            r#"
            vault-service = "com.example.myapp"
            vault-account = "myusername"
            vault-reason = "unlock backups"
        "#,
        )
        .unwrap();
        let credential = cfg.vault_credential().unwrap();
        assert_eq!(
            credential.key(),
            &CredentialKey::new("com.example.myapp", "myusername")
        );
        assert_eq!(credential.reason(), "unlock backups");
    }

    #[test]
    fn blank_vault_reason_uses_default_prompt() {
        let cfg: Config = toml::from_str(
            r#"
            vault-service = "svc"
            vault-account = "acct"
            vault-reason = ""
        "#,
        )
        .unwrap();
        assert_eq!(
            cfg.vault_credential().unwrap().reason(),
            constants::vault::DEFAULT_REASON
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml"));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "auth-policy = [").unwrap();
        assert_eq!(load_config_from(&path), Config::default());
    }

    #[test]
    fn oversized_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let padding = "# padding\n".repeat(8 * 1024);
        std::fs::write(&path, format!("menu-title = \"Big\"\n{padding}")).unwrap();
        assert_eq!(load_config_from(&path), Config::default());
    }

    #[test]
    #[serial]
    fn env_var_overrides_location() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "menu-title = \"From Env\"").unwrap();

        std::env::set_var(constants::settings::CONFIG_ENV_VAR, &path);
        let resolved = config_path();
        let cfg = load_config();
        std::env::remove_var(constants::settings::CONFIG_ENV_VAR);

        assert_eq!(resolved, path);
        assert_eq!(cfg.menu_title(), "From Env");
    }

    #[test]
    #[serial]
    fn ensure_config_file_writes_default_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        std::env::set_var(constants::settings::CONFIG_ENV_VAR, &path);
        let created = ensure_config_file();
        std::fs::write(&path, "menu-title = \"Edited\"").unwrap();
        let again = ensure_config_file();
        std::env::remove_var(constants::settings::CONFIG_ENV_VAR);

        assert_eq!(created.as_deref(), Some(path.as_path()));
        assert_eq!(again.as_deref(), Some(path.as_path()));
        assert_eq!(load_config_from(&path).menu_title(), "Edited");
    }
}
