//! v1 form documents: blocks, signing parties, subscribers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockType};
use crate::ids::{AccountId, BlockId, PartyId};

/// Schema version written by the current engine.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Contact bound to a signing party once a signatory record matched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatoryAccount {
    pub account_id: AccountId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honorific: Option<String>,
}

/// A named signing role: "student", "entity", "coordinator".
///
/// `signed` is always false when the party comes out of migration; the
/// signing workflow flips it later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningParty {
    #[serde(rename = "_id")]
    pub id: PartyId,
    pub order: u32,
    #[serde(default)]
    pub signed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatory_account: Option<SignatoryAccount>,
}

impl SigningParty {
    /// An unsigned party with no bound account.
    pub fn new(id: PartyId, order: u32) -> Self {
        Self {
            id,
            order,
            signed: false,
            signatory_account: None,
        }
    }
}

/// A contact who receives the finished document without signing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub account_id: AccountId,
    #[serde(default)]
    pub name: String,
    pub email: String,
}

/// The ordered block list. Wrapped so the stored JSON reads
/// `"schema": { "blocks": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockSchema {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A complete v1 form document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub schema_version: u32,
    pub schema: BlockSchema,
    #[serde(default)]
    pub signing_parties: Vec<SigningParty>,
    #[serde(default)]
    pub subscribers: Vec<Subscriber>,
}

/// A v1 document invariant that failed to hold.
#[derive(Debug, thiserror::Error)]
pub enum InvariantViolation {
    #[error("duplicate block id: {0}")]
    DuplicateBlockId(BlockId),
    #[error("block {block} references undeclared party '{party}'")]
    UnresolvedParty { block: BlockId, party: PartyId },
}

impl FormDocument {
    /// The document's blocks in list order.
    pub fn blocks(&self) -> &[Block] {
        &self.schema.blocks
    }

    /// Look up a signing party by id.
    pub fn party(&self, id: &PartyId) -> Option<&SigningParty> {
        self.signing_parties.iter().find(|p| &p.id == id)
    }

    /// Check the structural invariants: block ids unique, every block's
    /// party either declared or the unknown sentinel.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut seen: HashSet<&BlockId> = HashSet::with_capacity(self.schema.blocks.len());
        for block in &self.schema.blocks {
            if !seen.insert(&block.id) {
                return Err(InvariantViolation::DuplicateBlockId(block.id.clone()));
            }
        }

        let declared: HashSet<&PartyId> = self.signing_parties.iter().map(|p| &p.id).collect();
        let unknown = PartyId::unknown();
        for block in &self.schema.blocks {
            let party = &block.signing_party_id;
            if party.same_identity(&unknown) || declared.contains(party) {
                continue;
            }
            return Err(InvariantViolation::UnresolvedParty {
                block: block.id.clone(),
                party: party.clone(),
            });
        }
        Ok(())
    }

    /// Next free id for an editor-created block.
    ///
    /// Continues above any `block-<kind>-<n>` counter already present, so
    /// new ids never collide with migrated or pasted ones.
    pub fn next_block_id(&self, block_type: BlockType) -> BlockId {
        let next = self
            .schema
            .blocks
            .iter()
            .filter_map(|b| b.id.counter())
            .max()
            .map_or(0, |n| n + 1);
        BlockId::mint(block_type.as_str(), next)
    }
}
