//! Account identity derivation for signatories and subscribers.

use praxis_types::AccountId;
use sha2::{Digest, Sha256};

use crate::options::{AccountIdStrategy, MigrationOptions};

/// Derive a stable account id for a contact.
///
/// `key` scopes the lookup (`signatory-<email>` / `subscriber-<email>`) so
/// explicit `account_mapping` overrides stay per-role. The override wins
/// unconditionally; otherwise the configured strategy applies.
pub fn resolve_account_id(key: &str, email: &str, options: &MigrationOptions) -> AccountId {
    if let Some(mapped) = options.account_mapping.get(key) {
        return AccountId::new(mapped.as_str());
    }
    match options.account_id_strategy {
        AccountIdStrategy::EmailHash => AccountId::new(format!("account-{}", email_digest(email))),
        AccountIdStrategy::Uuid => AccountId::new(format!("account-{}", uuid::Uuid::new_v4())),
        AccountIdStrategy::Email => AccountId::new(email),
    }
}

/// First 12 hex characters of SHA-256 over the raw email bytes.
fn email_digest(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    hex::encode(&digest[..6])
}
