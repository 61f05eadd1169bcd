//! Migration options and id-generation strategies.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// How party `_id`s are minted when no explicit mapping entry applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PartyIdStrategy {
    /// `party-<positional index>` (0-based). Deterministic.
    #[default]
    Index,
    /// `party-<slug of the party name>`. Deterministic.
    Name,
    /// `party-<random uuid>`. The one documented source of non-determinism.
    Uuid,
}

impl PartyIdStrategy {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyIdStrategy::Index => "index",
            PartyIdStrategy::Name => "name",
            PartyIdStrategy::Uuid => "uuid",
        }
    }
}

impl std::fmt::Display for PartyIdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How account ids are derived for contacts (signatories, subscribers).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AccountIdStrategy {
    /// `account-<first 12 hex of SHA-256(email)>`. Deterministic.
    #[default]
    EmailHash,
    /// `account-<random uuid>`.
    Uuid,
    /// The email itself, verbatim.
    Email,
}

impl AccountIdStrategy {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountIdStrategy::EmailHash => "email-hash",
            AccountIdStrategy::Uuid => "uuid",
            AccountIdStrategy::Email => "email",
        }
    }
}

impl std::fmt::Display for AccountIdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options controlling id generation and carried metadata.
///
/// Identical input plus identical options yields an identical document,
/// except under the `uuid` strategies. Explicit mapping entries always win
/// over the strategy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationOptions {
    pub party_id_strategy: PartyIdStrategy,
    pub account_id_strategy: AccountIdStrategy,
    /// Carry `label`/`tooltip_label`/`validator`/`prefiller` into the
    /// output. Off means structural migration only.
    pub preserve_descriptors: bool,
    /// Party name -> id, used verbatim when present.
    pub party_mapping: HashMap<String, String>,
    /// Contact key (`signatory-<email>` / `subscriber-<email>`) -> id,
    /// used verbatim when present.
    pub account_mapping: HashMap<String, String>,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            party_id_strategy: PartyIdStrategy::default(),
            account_id_strategy: AccountIdStrategy::default(),
            preserve_descriptors: true,
            party_mapping: HashMap::new(),
            account_mapping: HashMap::new(),
        }
    }
}
