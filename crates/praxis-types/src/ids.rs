//! Typed identifiers for blocks, signing parties, and accounts.
//!
//! All ID types wrap the string the platform stores. Ids are minted once
//! (by migration or the editor) and treated as opaque text afterwards. They
//! serialize transparently, so a `BlockId` is just `"block-form_field-3"`
//! on the wire.
//!
//! `PartyId` has a well-known sentinel via [`PartyId::unknown()`] for blocks
//! whose owning party could not be resolved.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block identifier (`block-<kind>-<counter>` for minted ids).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

/// A signing-party identifier (`party-<index|slug|uuid>`, or `"unknown"`).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(String);

/// An account identifier (`account-<hash|uuid>`, or a verbatim email).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_string_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Wrap an existing identifier string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// The raw identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into the underlying `String`.
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.0)
            }
        }
    };
}

impl_string_id!(BlockId, "BlockId");
impl_string_id!(PartyId, "PartyId");
impl_string_id!(AccountId, "AccountId");

// ── BlockId minting ─────────────────────────────────────────────────────────

impl BlockId {
    /// Mint a counter-scheme id: `block-<kind>-<counter>`.
    ///
    /// Migration and the editor both mint through this so uniqueness reduces
    /// to counter discipline.
    pub fn mint(kind: &str, counter: u64) -> Self {
        Self(format!("block-{kind}-{counter}"))
    }

    /// Trailing counter for ids following the `block-<kind>-<counter>`
    /// scheme. `None` for hand-written or foreign ids.
    pub fn counter(&self) -> Option<u64> {
        if !self.0.starts_with("block-") {
            return None;
        }
        self.0.rsplit('-').next()?.parse().ok()
    }
}

// ── PartyId sentinel ────────────────────────────────────────────────────────

/// Sentinel party id for blocks with no resolvable owner.
const UNKNOWN_PARTY: &str = "unknown";

impl PartyId {
    /// The well-known "unknown" party.
    ///
    /// Assigned when a legacy field names no party, or names one the
    /// document never declared. Deterministic: same value every time.
    pub fn unknown() -> Self {
        Self(UNKNOWN_PARTY.to_string())
    }

    /// Check if this is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_PARTY
    }

    /// Identity comparison for group matching, where an empty id and the
    /// unknown sentinel mean the same thing.
    ///
    /// Only edit *matching* uses this; index keys always use the verbatim
    /// value, so an empty id never spontaneously merges with "unknown".
    pub fn same_identity(&self, other: &PartyId) -> bool {
        fn norm(s: &str) -> &str {
            if s.is_empty() { UNKNOWN_PARTY } else { s }
        }
        norm(&self.0) == norm(&other.0)
    }
}

impl Default for PartyId {
    fn default() -> Self {
        Self::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── BlockId ─────────────────────────────────────────────────────────

    #[test]
    fn test_block_id_mint_format() {
        let id = BlockId::mint("form_field", 3);
        assert_eq!(id.as_str(), "block-form_field-3");
    }

    #[test]
    fn test_block_id_counter_parse() {
        assert_eq!(BlockId::mint("header", 0).counter(), Some(0));
        assert_eq!(BlockId::mint("form_phantom_field", 17).counter(), Some(17));
    }

    #[test]
    fn test_block_id_counter_rejects_foreign_ids() {
        assert_eq!(BlockId::new("b1").counter(), None);
        assert_eq!(BlockId::new("block-header-x").counter(), None);
        assert_eq!(BlockId::new("imported-42").counter(), None);
    }

    #[test]
    fn test_block_id_serde_transparent() {
        let id = BlockId::mint("paragraph", 5);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"block-paragraph-5\"");
        let parsed: BlockId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_block_id_hash_usable_as_map_key() {
        use std::collections::HashMap;
        let id = BlockId::mint("header", 1);
        let mut map = HashMap::new();
        map.insert(id.clone(), "hello");
        assert_eq!(map.get(&id), Some(&"hello"));
    }

    #[test]
    fn test_block_id_debug_names_the_type() {
        let id = BlockId::new("b1");
        assert_eq!(format!("{id:?}"), "BlockId(b1)");
    }

    // ── PartyId ─────────────────────────────────────────────────────────

    #[test]
    fn test_party_unknown_sentinel() {
        let p = PartyId::unknown();
        assert_eq!(p.as_str(), "unknown");
        assert!(p.is_unknown());
        assert!(!PartyId::new("party-0").is_unknown());
    }

    #[test]
    fn test_party_default_is_unknown() {
        assert_eq!(PartyId::default(), PartyId::unknown());
    }

    #[test]
    fn test_party_same_identity_equivalence() {
        let empty = PartyId::new("");
        let unknown = PartyId::unknown();
        let real = PartyId::new("party-0");

        assert!(empty.same_identity(&unknown));
        assert!(unknown.same_identity(&empty));
        assert!(empty.same_identity(&empty));
        assert!(real.same_identity(&real));
        assert!(!real.same_identity(&unknown));
        assert!(!real.same_identity(&empty));
    }

    #[test]
    fn test_party_verbatim_inequality() {
        // same_identity normalizes; plain equality never does
        assert_ne!(PartyId::new(""), PartyId::unknown());
    }

    // ── AccountId ───────────────────────────────────────────────────────

    #[test]
    fn test_account_id_serde_transparent() {
        let id = AccountId::new("account-478abec74305");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"account-478abec74305\"");
    }

    #[test]
    fn test_account_id_from_email() {
        let id = AccountId::from("a@x.com");
        assert_eq!(id.as_str(), "a@x.com");
        assert_eq!(id.to_string(), "a@x.com");
    }
}
