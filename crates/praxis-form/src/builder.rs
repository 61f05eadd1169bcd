//! Block construction from legacy field lists.
//!
//! Positioned fields become `form_field` blocks laid out in reading order.
//! Zero-area fields and declared phantoms land in a tail of
//! `form_phantom_field` blocks whose orders start at
//! [`PHANTOM_ORDER_BASE`], past anything the page layout can produce.

use std::cmp::Ordering;

use praxis_types::{
    Block, BlockType, FieldSchema, LegacyField, LegacyPhantomField, PartyId, PhantomFieldSchema,
};

use crate::classify::{FieldClass, classify};
use crate::migrate::MigrationCx;
use crate::options::MigrationOptions;

/// First order value of the phantom tail. Keeps phantom blocks after every
/// positioned block without renumbering when positioned counts change.
pub const PHANTOM_ORDER_BASE: u32 = 1000;

/// Build the v1 block list for one document.
///
/// One reading-order sort covers both partitions: positioned blocks take
/// their final order from it, and zero-area fields keep their relative
/// order inside the tail. Declared phantoms follow in input order.
pub(crate) fn build_blocks(
    fields: &[LegacyField],
    phantoms: &[LegacyPhantomField],
    cx: &mut MigrationCx,
) -> Vec<Block> {
    let mut ordered: Vec<&LegacyField> = fields.iter().collect();
    ordered.sort_by(|a, b| reading_order(a, b));

    let (positioned, parked): (Vec<&LegacyField>, Vec<&LegacyField>) = ordered
        .into_iter()
        .partition(|f| classify(f) == FieldClass::Positioned);

    let mut blocks = Vec::with_capacity(fields.len() + phantoms.len());

    for (i, field) in positioned.into_iter().enumerate() {
        let party = cx.field_party(field.party.as_deref(), &field.field);
        let schema = positioned_schema(field, party, cx.options);
        let id = cx.next_block_id(BlockType::FormField);
        blocks.push(Block::form_field(id, i as u32, schema));
    }

    let mut order = PHANTOM_ORDER_BASE;
    for field in parked {
        let party = cx.field_party(field.party.as_deref(), &field.field);
        let schema = positioned_schema(field, party, cx.options).into_phantom();
        let id = cx.next_block_id(BlockType::FormPhantomField);
        blocks.push(Block::form_phantom_field(id, order, schema));
        order += 1;
    }
    for phantom in phantoms {
        let party = cx.field_party(phantom.party.as_deref(), &phantom.field);
        let schema = phantom_schema(phantom, party, cx.options);
        let id = cx.next_block_id(BlockType::FormPhantomField);
        blocks.push(Block::form_phantom_field(id, order, schema));
        order += 1;
    }

    blocks
}

/// Page, then top-to-bottom, then left-to-right. `total_cmp` keeps the sort
/// total even if a stored coordinate is NaN.
fn reading_order(a: &LegacyField, b: &LegacyField) -> Ordering {
    a.page
        .cmp(&b.page)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.x.total_cmp(&b.x))
}

fn positioned_schema(field: &LegacyField, party: PartyId, options: &MigrationOptions) -> FieldSchema {
    let mut schema = FieldSchema {
        field: field.field.clone(),
        label: field.label.clone(),
        field_type: field.field_type.into(),
        source: field.source.clone(),
        shared: field.shared,
        tooltip_label: field.tooltip.clone(),
        validator: field.validator.clone(),
        prefiller: field.prefiller.clone(),
        signing_party_id: party,
        x: field.x,
        y: field.y,
        w: field.w,
        h: field.h,
        page: field.page,
        align_h: field.align_h,
        align_v: field.align_v,
    };
    if !options.preserve_descriptors {
        schema.label = String::new();
        schema.tooltip_label = None;
        schema.validator = None;
        schema.prefiller = None;
    }
    schema
}

fn phantom_schema(
    phantom: &LegacyPhantomField,
    party: PartyId,
    options: &MigrationOptions,
) -> PhantomFieldSchema {
    let mut schema = PhantomFieldSchema {
        field: phantom.field.clone(),
        label: phantom.label.clone(),
        field_type: phantom.field_type.into(),
        source: phantom.source.clone(),
        shared: phantom.shared,
        tooltip_label: phantom.tooltip.clone(),
        validator: phantom.validator.clone(),
        prefiller: phantom.prefiller.clone(),
        signing_party_id: party,
    };
    if !options.preserve_descriptors {
        schema.label = String::new();
        schema.tooltip_label = None;
        schema.validator = None;
        schema.prefiller = None;
    }
    schema
}
