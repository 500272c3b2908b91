//! Keychain Services generic-password backend.
//!
//! `get_generic_password` copies the item out of the `CFData` returned by
//! `SecItemCopyMatching` and releases it unwiped. Only the copy handed to us
//! is held in `Zeroizing`; the released `CFData` page is left to the allocator.

use crate::error::Result;
use crate::secure_store::{classify_store_status, CredentialKey, SecretStore};
use security_framework::passwords::get_generic_password;
use zeroize::Zeroizing;

#[derive(Debug, Default, Clone, Copy)]
pub struct KeychainStore;

impl SecretStore for KeychainStore {
    fn copy_matching(&self, key: &CredentialKey) -> Result<Zeroizing<Vec<u8>>> {
        get_generic_password(&key.service, &key.account)
            .map(Zeroizing::new)
            .map_err(|err| classify_store_status(err.code(), err.to_string()))
    }
}
