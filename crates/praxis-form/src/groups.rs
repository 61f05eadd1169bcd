//! Logical field groups over a block list.
//!
//! The form editor edits *fields*, not blocks: every block sharing a field
//! name and party is one logical thing, wherever its copies sit on the
//! page. [`rebuild_groups`] derives that view from scratch; the callers
//! re-derive after every block mutation rather than patching the index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use praxis_types::{Block, BlockId, BlockType, FieldType, PartyId};

/// One logical group: a single text block, or every field block sharing a
/// field name and party.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockGroup {
    /// Stable lookup key. Text blocks use their block id; field groups use
    /// `<field>-<party>-<type>`.
    pub key: String,
    pub block_type: BlockType,
    /// Empty for text groups.
    pub field_name: String,
    /// Party exactly as the member blocks carry it. An empty id is kept
    /// empty here so rebuilding never rewrites blocks by accident.
    pub party_id: PartyId,
    /// Member ids in block-list order.
    pub block_ids: Vec<BlockId>,
}

/// Derived group index. Iteration follows first appearance in the block
/// list, so the editor's sidebar order is stable across rebuilds.
#[derive(Clone, Debug, Default)]
pub struct GroupIndex {
    order: Vec<String>,
    groups: HashMap<String, BlockGroup>,
}

impl GroupIndex {
    pub fn get(&self, key: &str) -> Option<&BlockGroup> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockGroup> {
        self.order.iter().filter_map(|k| self.groups.get(k))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Rebuild the group index from the full block list.
///
/// Always a complete recompute. Field groups are keyed on the party id
/// verbatim, so an empty party and the explicit unknown party form separate
/// groups even though updates treat them as the same identity.
pub fn rebuild_groups(blocks: &[Block]) -> GroupIndex {
    let mut index = GroupIndex::default();

    for block in blocks {
        let key = match block.block_type {
            BlockType::Header | BlockType::Paragraph => block.id.to_string(),
            BlockType::FormField | BlockType::FormPhantomField => format!(
                "{}-{}-{}",
                block.field_name().unwrap_or(""),
                block.signing_party_id.as_str(),
                block.block_type.as_str()
            ),
        };

        match index.groups.get_mut(&key) {
            Some(group) => {
                if !block.is_field() {
                    // Two text blocks under one id: upstream invariant broke.
                    tracing::warn!(block_id = %block.id, "duplicate block id while grouping");
                }
                group.block_ids.push(block.id.clone());
            }
            None => {
                index.order.push(key.clone());
                index.groups.insert(
                    key.clone(),
                    BlockGroup {
                        key,
                        block_type: block.block_type,
                        field_name: block.field_name().unwrap_or("").to_string(),
                        party_id: block.signing_party_id.clone(),
                        block_ids: vec![block.id.clone()],
                    },
                );
            }
        }
    }

    index
}

/// A partial edit to one logical group. Absent members leave the block
/// untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldUpdate {
    pub field: Option<String>,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub source: Option<String>,
    pub tooltip_label: Option<String>,
    pub shared: Option<bool>,
    pub validator: Option<String>,
    pub prefiller: Option<String>,
    pub block_type: Option<BlockType>,
    pub signing_party_id: Option<PartyId>,
    pub text_content: Option<String>,
}

/// Whether `block` belongs to `group` for editing purposes.
///
/// Text groups match by member id. Field groups match by logical identity,
/// name plus party, across both field block types, so retyping a field
/// through either of its groups reaches every copy. Party comparison treats
/// the empty id and the unknown sentinel as the same signer.
fn group_matches(block: &Block, group: &BlockGroup) -> bool {
    if !group.block_type.is_field() {
        return group.block_ids.contains(&block.id);
    }
    block.is_field()
        && block.field_name().unwrap_or("") == group.field_name
        && block.signing_party_id.same_identity(&group.party_id)
}

/// Apply `update` to every block in `group`, returning the new block list.
///
/// Never fails: a stale group, one whose members were renamed or removed
/// since it was built, simply matches nothing and the input comes back
/// unchanged. Callers rebuild the index from the result.
pub fn apply_group_update(blocks: &[Block], group: &BlockGroup, update: &FieldUpdate) -> Vec<Block> {
    // Applies to whichever schema the block carries after any retype.
    macro_rules! apply_schema_update {
        ($schema:expr) => {
            if let Some(schema) = $schema {
                if let Some(field) = &update.field {
                    schema.field = field.clone();
                }
                if let Some(label) = &update.label {
                    schema.label = label.clone();
                }
                if let Some(field_type) = update.field_type {
                    schema.field_type = field_type;
                }
                if let Some(source) = &update.source {
                    schema.source = Some(source.clone());
                }
                if let Some(tooltip) = &update.tooltip_label {
                    schema.tooltip_label = Some(tooltip.clone());
                }
                if let Some(shared) = update.shared {
                    schema.shared = shared;
                }
                if let Some(validator) = &update.validator {
                    schema.validator = Some(validator.clone());
                }
                if let Some(prefiller) = &update.prefiller {
                    schema.prefiller = Some(prefiller.clone());
                }
            }
        };
    }

    blocks
        .iter()
        .map(|block| {
            if !group_matches(block, group) {
                return block.clone();
            }
            let mut block = block.clone();

            // Retype first so later edits land on the surviving payload.
            if let Some(target) = update.block_type {
                block.set_block_type(target);
            }
            if let Some(party) = &update.signing_party_id {
                block.set_party(party.clone());
            }
            if let Some(text) = &update.text_content {
                if block.block_type.has_text_content() {
                    block.text_content = Some(text.clone());
                }
            }
            apply_schema_update!(block.field_schema.as_mut());
            apply_schema_update!(block.phantom_field_schema.as_mut());

            block
        })
        .collect()
}

/// Drop every block in `group`, returning the survivors. Same matching
/// rules as [`apply_group_update`], same tolerance of stale groups.
pub fn remove_group(blocks: &[Block], group: &BlockGroup) -> Vec<Block> {
    blocks
        .iter()
        .filter(|block| !group_matches(block, group))
        .cloned()
        .collect()
}
