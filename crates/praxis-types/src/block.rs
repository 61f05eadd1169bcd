//! Block model for v1 form documents.
//!
//! A form document is an ordered list of blocks. Each block is text
//! (header/paragraph) or a fillable field (positioned/phantom), and carries
//! exactly one payload matching its type.
//!
//! ## Design: BlockType + payload options
//!
//! `BlockType` is deliberately small: 4 variants covering what a block *is*.
//! The payload lives in `Option` fields on [`Block`]:
//!
//! - `text_content` on Header/Paragraph
//! - `field_schema` on FormField (has on-page geometry)
//! - `phantom_field_schema` on FormPhantomField (no geometry, ever)
//!
//! Phantom fields are data-only: email routing keys, computed parameters,
//! fields the form designer parked off-document. Dropping a field's geometry
//! is one-way; a phantom re-entering the page starts from a zeroed box.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::{BlockId, PartyId};

/// What a block *is* (structural role in the document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BlockType {
    /// Section heading text.
    Header,
    /// Flowing body text.
    #[default]
    Paragraph,
    /// Fillable field with an on-page box.
    FormField,
    /// Fillable field with no on-page placement.
    FormPhantomField,
}

impl BlockType {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Header => "header",
            BlockType::Paragraph => "paragraph",
            BlockType::FormField => "form_field",
            BlockType::FormPhantomField => "form_phantom_field",
        }
    }

    /// Check if this block type carries a fillable-field payload.
    pub fn is_field(&self) -> bool {
        matches!(self, BlockType::FormField | BlockType::FormPhantomField)
    }

    /// Check if this block type carries free text instead of a field.
    pub fn has_text_content(&self) -> bool {
        matches!(self, BlockType::Header | BlockType::Paragraph)
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value kind of a fillable field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FieldType {
    /// Free text entry.
    #[default]
    Text,
    /// Signature capture.
    Signature,
    /// Email address (phantom routing key).
    Email,
    /// Derived value, filled by an external evaluator.
    Computed,
}

impl FieldType {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Signature => "signature",
            FieldType::Email => "email",
            FieldType::Computed => "computed",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Horizontal text alignment inside a field box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment inside a field box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Schema for a positioned field: identity, descriptors, and the page box.
///
/// Coordinates are PDF points; `page` is 1-based. `validator` and
/// `prefiller` are opaque expression strings, carried but never evaluated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Logical field key, e.g. `entity.legal-name`.
    pub field: String,
    /// Human-facing label. Empty means none and stays off the wire.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Provenance tag (where prefilled data comes from).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Whether the value is shared across all documents of a request.
    #[serde(default, skip_serializing_if = "is_false")]
    pub shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefiller: Option<String>,
    /// Owning party; mirrors the block-level value.
    #[serde(default)]
    pub signing_party_id: PartyId,

    // Geometry (positioned fields only)
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_h: Option<HAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_v: Option<VAlign>,
}

impl FieldSchema {
    /// A blank schema for editor-created fields (zeroed box on page 1).
    pub fn empty(signing_party_id: PartyId) -> Self {
        Self {
            field: String::new(),
            label: String::new(),
            field_type: FieldType::default(),
            source: None,
            shared: false,
            tooltip_label: None,
            validator: None,
            prefiller: None,
            signing_party_id,
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            page: 1,
            align_h: None,
            align_v: None,
        }
    }

    /// Drop the geometry for a phantom placement.
    ///
    /// One-way: the box is not recoverable. Alignment goes with it.
    pub fn into_phantom(self) -> PhantomFieldSchema {
        PhantomFieldSchema {
            field: self.field,
            label: self.label,
            field_type: self.field_type,
            source: self.source,
            shared: self.shared,
            tooltip_label: self.tooltip_label,
            validator: self.validator,
            prefiller: self.prefiller,
            signing_party_id: self.signing_party_id,
        }
    }
}

/// Schema for a phantom field: everything [`FieldSchema`] has minus geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhantomFieldSchema {
    pub field: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefiller: Option<String>,
    #[serde(default)]
    pub signing_party_id: PartyId,
}

impl PhantomFieldSchema {
    /// A blank schema for editor-created phantom fields.
    pub fn empty(signing_party_id: PartyId) -> Self {
        Self {
            field: String::new(),
            label: String::new(),
            field_type: FieldType::default(),
            source: None,
            shared: false,
            tooltip_label: None,
            validator: None,
            prefiller: None,
            signing_party_id,
        }
    }

    /// Re-enter the positioned world with a zeroed box on page 1.
    ///
    /// The editor assigns real geometry afterwards.
    pub fn into_positioned(self) -> FieldSchema {
        FieldSchema {
            field: self.field,
            label: self.label,
            field_type: self.field_type,
            source: self.source,
            shared: self.shared,
            tooltip_label: self.tooltip_label,
            validator: self.validator,
            prefiller: self.prefiller,
            signing_party_id: self.signing_party_id,
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            page: 1,
            align_h: None,
            align_v: None,
        }
    }
}

/// Helper for `#[serde(skip_serializing_if)]` on bool fields.
fn is_false(v: &bool) -> bool {
    !v
}

/// One unit of document structure.
///
/// Exactly one payload field is populated, matching `block_type`. A block
/// deserialized without `signing_party_id` defaults to the unknown sentinel.
///
/// ## Field groups
///
/// - **Core**: _id, block_type, order, signing_party_id
/// - **Text** (Header/Paragraph): text_content
/// - **Field** (FormField): field_schema
/// - **Phantom** (FormPhantomField): phantom_field_schema
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique within the document's block list.
    #[serde(rename = "_id")]
    pub id: BlockId,
    pub block_type: BlockType,
    /// Document sequence. Positioned fields count up from 0; phantom fields
    /// live in a reserved tail region (1000+).
    pub order: u32,
    /// Owning party `_id`, or the unknown sentinel.
    #[serde(default)]
    pub signing_party_id: PartyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_schema: Option<FieldSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phantom_field_schema: Option<PhantomFieldSchema>,
}

impl Block {
    /// Create a header block.
    pub fn header(id: BlockId, order: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            block_type: BlockType::Header,
            order,
            signing_party_id: PartyId::unknown(),
            text_content: Some(text.into()),
            field_schema: None,
            phantom_field_schema: None,
        }
    }

    /// Create a paragraph block.
    pub fn paragraph(id: BlockId, order: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            block_type: BlockType::Paragraph,
            order,
            signing_party_id: PartyId::unknown(),
            text_content: Some(text.into()),
            field_schema: None,
            phantom_field_schema: None,
        }
    }

    /// Create a positioned field block. The block-level party mirrors the
    /// schema's.
    pub fn form_field(id: BlockId, order: u32, schema: FieldSchema) -> Self {
        Self {
            id,
            block_type: BlockType::FormField,
            order,
            signing_party_id: schema.signing_party_id.clone(),
            text_content: None,
            field_schema: Some(schema),
            phantom_field_schema: None,
        }
    }

    /// Create a phantom field block. The block-level party mirrors the
    /// schema's.
    pub fn form_phantom_field(id: BlockId, order: u32, schema: PhantomFieldSchema) -> Self {
        Self {
            id,
            block_type: BlockType::FormPhantomField,
            order,
            signing_party_id: schema.signing_party_id.clone(),
            text_content: None,
            field_schema: None,
            phantom_field_schema: Some(schema),
        }
    }

    /// Check if this is a field block (positioned or phantom).
    pub fn is_field(&self) -> bool {
        self.block_type.is_field()
    }

    /// Logical field name, from whichever schema the block carries.
    pub fn field_name(&self) -> Option<&str> {
        self.field_schema
            .as_ref()
            .map(|s| s.field.as_str())
            .or_else(|| self.phantom_field_schema.as_ref().map(|s| s.field.as_str()))
    }

    /// Set the owning party on the block and its schema together.
    pub fn set_party(&mut self, party: PartyId) {
        if let Some(schema) = self.field_schema.as_mut() {
            schema.signing_party_id = party.clone();
        }
        if let Some(schema) = self.phantom_field_schema.as_mut() {
            schema.signing_party_id = party.clone();
        }
        self.signing_party_id = party;
    }

    /// Retype the block, converting its payload.
    ///
    /// Field/phantom retypes keep the schema (geometry dropped going
    /// phantom, zeroed coming back). Retypes across the field/text families
    /// fall back to an empty payload of the target family.
    pub fn set_block_type(&mut self, target: BlockType) {
        if self.block_type == target {
            return;
        }
        match target {
            BlockType::Header | BlockType::Paragraph => {
                self.field_schema = None;
                self.phantom_field_schema = None;
                if self.text_content.is_none() {
                    self.text_content = Some(String::new());
                }
            }
            BlockType::FormField => {
                let schema = self
                    .field_schema
                    .take()
                    .or_else(|| {
                        self.phantom_field_schema
                            .take()
                            .map(PhantomFieldSchema::into_positioned)
                    })
                    .unwrap_or_else(|| FieldSchema::empty(self.signing_party_id.clone()));
                self.text_content = None;
                self.phantom_field_schema = None;
                self.field_schema = Some(schema);
            }
            BlockType::FormPhantomField => {
                let schema = self
                    .phantom_field_schema
                    .take()
                    .or_else(|| self.field_schema.take().map(FieldSchema::into_phantom))
                    .unwrap_or_else(|| PhantomFieldSchema::empty(self.signing_party_id.clone()));
                self.text_content = None;
                self.field_schema = None;
                self.phantom_field_schema = Some(schema);
            }
        }
        self.block_type = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positioned_schema(field: &str, party: &str) -> FieldSchema {
        FieldSchema {
            field: field.to_string(),
            label: field.to_string(),
            field_type: FieldType::Text,
            source: None,
            shared: false,
            tooltip_label: None,
            validator: None,
            prefiller: None,
            signing_party_id: PartyId::new(party),
            x: 10.0,
            y: 20.0,
            w: 120.0,
            h: 14.0,
            page: 1,
            align_h: None,
            align_v: None,
        }
    }

    // ── BlockType ───────────────────────────────────────────────────────

    #[test]
    fn test_block_type_parsing() {
        assert_eq!(BlockType::from_str("header"), Some(BlockType::Header));
        assert_eq!(BlockType::from_str("PARAGRAPH"), Some(BlockType::Paragraph));
        assert_eq!(BlockType::from_str("form_field"), Some(BlockType::FormField));
        assert_eq!(
            BlockType::from_str("form_phantom_field"),
            Some(BlockType::FormPhantomField)
        );
        assert_eq!(BlockType::from_str("invalid"), None);
    }

    #[test]
    fn test_block_type_serde_strings() {
        assert_eq!(
            serde_json::to_string(&BlockType::FormField).unwrap(),
            "\"form_field\""
        );
        assert_eq!(
            serde_json::to_string(&BlockType::FormPhantomField).unwrap(),
            "\"form_phantom_field\""
        );
        let parsed: BlockType = serde_json::from_str("\"header\"").unwrap();
        assert_eq!(parsed, BlockType::Header);
    }

    #[test]
    fn test_block_type_families() {
        assert!(BlockType::FormField.is_field());
        assert!(BlockType::FormPhantomField.is_field());
        assert!(!BlockType::Header.is_field());
        assert!(BlockType::Header.has_text_content());
        assert!(BlockType::Paragraph.has_text_content());
        assert!(!BlockType::FormField.has_text_content());
    }

    // ── FieldType ───────────────────────────────────────────────────────

    #[test]
    fn test_field_type_parsing() {
        assert_eq!(FieldType::from_str("text"), Some(FieldType::Text));
        assert_eq!(FieldType::from_str("SIGNATURE"), Some(FieldType::Signature));
        assert_eq!(FieldType::from_str("email"), Some(FieldType::Email));
        assert_eq!(FieldType::from_str("computed"), Some(FieldType::Computed));
        assert_eq!(FieldType::from_str("checkbox"), None);
    }

    // ── Block construction ──────────────────────────────────────────────

    #[test]
    fn test_header_block() {
        let block = Block::header(BlockId::mint("header", 0), 0, "Terms");
        assert_eq!(block.block_type, BlockType::Header);
        assert_eq!(block.text_content.as_deref(), Some("Terms"));
        assert!(block.field_schema.is_none());
        assert!(block.signing_party_id.is_unknown());
        assert!(!block.is_field());
        assert_eq!(block.field_name(), None);
    }

    #[test]
    fn test_form_field_block_mirrors_party() {
        let schema = positioned_schema("entity.legal-name", "party-1");
        let block = Block::form_field(BlockId::mint("form_field", 2), 2, schema);
        assert_eq!(block.signing_party_id, PartyId::new("party-1"));
        assert_eq!(block.field_name(), Some("entity.legal-name"));
        assert!(block.is_field());
    }

    #[test]
    fn test_set_party_updates_schema_too() {
        let schema = positioned_schema("student.name", "party-0");
        let mut block = Block::form_field(BlockId::mint("form_field", 0), 0, schema);
        block.set_party(PartyId::new("party-9"));
        assert_eq!(block.signing_party_id.as_str(), "party-9");
        assert_eq!(
            block.field_schema.unwrap().signing_party_id.as_str(),
            "party-9"
        );
    }

    // ── Serde shape ─────────────────────────────────────────────────────

    #[test]
    fn test_block_serializes_with_underscore_id() {
        let block = Block::paragraph(BlockId::new("b7"), 1, "body");
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["_id"], "b7");
        assert_eq!(value["block_type"], "paragraph");
        assert_eq!(value["text_content"], "body");
        assert!(value.get("field_schema").is_none());
    }

    #[test]
    fn test_missing_party_defaults_to_unknown() {
        let block: Block = serde_json::from_value(serde_json::json!({
            "_id": "b1",
            "block_type": "paragraph",
            "order": 0,
            "text_content": "hello"
        }))
        .unwrap();
        assert!(block.signing_party_id.is_unknown());
    }

    #[test]
    fn test_explicit_empty_party_is_kept() {
        let block: Block = serde_json::from_value(serde_json::json!({
            "_id": "b1",
            "block_type": "paragraph",
            "order": 0,
            "signing_party_id": "",
            "text_content": ""
        }))
        .unwrap();
        assert_eq!(block.signing_party_id.as_str(), "");
        assert!(!block.signing_party_id.is_unknown());
    }

    #[test]
    fn test_phantom_schema_never_serializes_geometry() {
        let schema = positioned_schema("tor.email", "party-0").into_phantom();
        let block = Block::form_phantom_field(BlockId::mint("form_phantom_field", 3), 1000, schema);
        let value = serde_json::to_value(&block).unwrap();
        let payload = value["phantom_field_schema"].as_object().unwrap();
        assert!(!payload.contains_key("x"));
        assert!(!payload.contains_key("y"));
        assert!(!payload.contains_key("w"));
        assert!(!payload.contains_key("h"));
        assert!(!payload.contains_key("page"));
        assert_eq!(payload["type"], "text");
    }

    #[test]
    fn test_shared_flag_skipped_when_false() {
        let mut schema = positioned_schema("a", "party-0");
        let value =
            serde_json::to_value(Block::form_field(BlockId::new("b1"), 0, schema.clone())).unwrap();
        assert!(value["field_schema"].get("shared").is_none());

        schema.shared = true;
        let value = serde_json::to_value(Block::form_field(BlockId::new("b2"), 0, schema)).unwrap();
        assert_eq!(value["field_schema"]["shared"], true);
    }

    #[test]
    fn test_empty_label_skipped() {
        let mut schema = positioned_schema("a", "party-0");
        schema.label = String::new();
        let value = serde_json::to_value(Block::form_field(BlockId::new("b1"), 0, schema)).unwrap();
        assert!(value["field_schema"].get("label").is_none());

        let phantom = positioned_schema("b", "party-0").into_phantom();
        let value =
            serde_json::to_value(Block::form_phantom_field(BlockId::new("b2"), 1000, phantom))
                .unwrap();
        assert_eq!(value["phantom_field_schema"]["label"], "b");
    }

    #[test]
    fn test_block_json_roundtrip() {
        let schema = positioned_schema("entity.legal-name", "party-1");
        let block = Block::form_field(BlockId::mint("form_field", 4), 4, schema);
        let json = serde_json::to_string(&block).unwrap();
        let parsed: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, block);
    }

    // ── Retyping ────────────────────────────────────────────────────────

    #[test]
    fn test_retype_field_to_phantom_drops_geometry() {
        let schema = positioned_schema("ops.notify", "party-2");
        let mut block = Block::form_field(BlockId::new("b1"), 3, schema);
        block.set_block_type(BlockType::FormPhantomField);

        assert_eq!(block.block_type, BlockType::FormPhantomField);
        assert!(block.field_schema.is_none());
        let phantom = block.phantom_field_schema.unwrap();
        assert_eq!(phantom.field, "ops.notify");
        assert_eq!(phantom.signing_party_id.as_str(), "party-2");
    }

    #[test]
    fn test_retype_phantom_to_field_zeroes_box() {
        let schema = positioned_schema("x", "party-0").into_phantom();
        let mut block = Block::form_phantom_field(BlockId::new("b1"), 1000, schema);
        block.set_block_type(BlockType::FormField);

        let field = block.field_schema.unwrap();
        assert_eq!(field.w, 0.0);
        assert_eq!(field.h, 0.0);
        assert_eq!(field.page, 1);
    }

    #[test]
    fn test_retype_field_to_paragraph_gets_empty_text() {
        let schema = positioned_schema("x", "party-0");
        let mut block = Block::form_field(BlockId::new("b1"), 0, schema);
        block.set_block_type(BlockType::Paragraph);

        assert_eq!(block.text_content.as_deref(), Some(""));
        assert!(block.field_schema.is_none());
        assert!(block.phantom_field_schema.is_none());
    }

    #[test]
    fn test_retype_header_to_paragraph_keeps_text() {
        let mut block = Block::header(BlockId::new("b1"), 0, "Terms");
        block.set_block_type(BlockType::Paragraph);
        assert_eq!(block.text_content.as_deref(), Some("Terms"));
    }

    #[test]
    fn test_retype_same_type_is_noop() {
        let schema = positioned_schema("x", "party-0");
        let mut block = Block::form_field(BlockId::new("b1"), 0, schema.clone());
        block.set_block_type(BlockType::FormField);
        assert_eq!(block.field_schema, Some(schema));
    }
}
