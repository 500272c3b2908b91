//! Secret lookup in the system credential store.
//!
//! The store query is already synchronous, so no bridging happens here.
//! Every failure reads as "not found" through [`SecureStoreAdapter::lookup_secret`];
//! [`SecureStoreAdapter::try_lookup_secret`] keeps the kinds apart for diagnostics.

use crate::error::{BridgeError, Result};
use std::fmt;
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

/// Identifies one generic-password item. Uniqueness is the store's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialKey {
    pub service: String,
    pub account: String,
}

impl CredentialKey {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum CredentialLookup {
    Found(Zeroizing<String>),
    NotFound,
}

impl CredentialLookup {
    pub fn into_secret(self) -> Option<Zeroizing<String>> {
        match self {
            Self::Found(secret) => Some(secret),
            Self::NotFound => None,
        }
    }
}

impl fmt::Debug for CredentialLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(_) => f.write_str("Found(<redacted>)"),
            Self::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Seam over the platform credential store.
#[cfg_attr(test, mockall::automock)]
pub trait SecretStore: Send + Sync {
    /// Exact-match query returning the raw secret bytes.
    fn copy_matching(&self, key: &CredentialKey) -> Result<Zeroizing<Vec<u8>>>;
}

pub struct SecureStoreAdapter<S> {
    store: S,
}

impl<S: SecretStore> SecureStoreAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn lookup_secret(&self, key: &CredentialKey) -> CredentialLookup {
        match self.try_lookup_secret(key) {
            Ok(secret) => CredentialLookup::Found(secret),
            Err(err) => {
                debug!(service = %key.service, account = %key.account, error = %err, "Secret lookup failed");
                CredentialLookup::NotFound
            }
        }
    }

    /// Like `lookup_secret`, but undecodable bytes still surface as `NotFound`
    /// while denial and platform failures keep their own kind.
    pub fn try_lookup_secret(&self, key: &CredentialKey) -> Result<Zeroizing<String>> {
        let mut bytes = self.store.copy_matching(key)?;
        match String::from_utf8(std::mem::take(&mut *bytes)) {
            Ok(secret) => Ok(Zeroizing::new(secret)),
            Err(err) => {
                warn!(service = %key.service, account = %key.account, "Stored secret is not valid UTF-8");
                err.into_bytes().zeroize();
                Err(BridgeError::NotFound)
            }
        }
    }
}

/// Keychain Services result codes (`OSStatus`).
pub mod sec_status {
    pub const USER_CANCELED: i32 = -128;
    pub const AUTH_FAILED: i32 = -25293;
    pub const ITEM_NOT_FOUND: i32 = -25300;
    pub const INTERACTION_NOT_ALLOWED: i32 = -25308;
}

/// Map a non-success Keychain status onto the bridge taxonomy.
pub fn classify_store_status(status: i32, message: impl Into<String>) -> BridgeError {
    use sec_status::*;
    match status {
        ITEM_NOT_FOUND => BridgeError::NotFound,
        USER_CANCELED | AUTH_FAILED | INTERACTION_NOT_ALLOWED => BridgeError::Denied,
        _ => BridgeError::platform(status, message),
    }
}
