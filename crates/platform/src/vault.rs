//! Secrets released only to the verified device owner.
//!
//! The store is not queried until authentication has been granted; any
//! authentication failure short-circuits the lookup.

use crate::authenticator::{Authenticator, PolicyEvaluator};
use crate::error::Result;
use crate::secure_store::{CredentialKey, SecretStore, SecureStoreAdapter};
use tracing::{debug, info};
use zeroize::Zeroizing;

/// A credential plus the reason shown when asking for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatedCredential {
    key: CredentialKey,
    reason: String,
}

impl GatedCredential {
    pub fn new(key: CredentialKey, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }

    pub fn key(&self) -> &CredentialKey {
        &self.key
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Authenticate, then read the secret.
    pub fn acquire<E, S>(
        &self,
        authenticator: &Authenticator<E>,
        store: &SecureStoreAdapter<S>,
    ) -> Result<Zeroizing<String>>
    where
        E: PolicyEvaluator,
        S: SecretStore,
    {
        if let Err(err) = authenticator.authenticate_detailed(&self.reason) {
            info!(service = %self.key.service, error = %err, "Secret withheld, owner not verified");
            return Err(err);
        }
        debug!(service = %self.key.service, account = %self.key.account, "Owner verified, reading secret");
        store.try_lookup_secret(&self.key)
    }
}
