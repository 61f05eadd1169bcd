//! Legacy (v0) form records, consumed only as migration input.
//!
//! These types deserialize the flat pre-block representation and exist just
//! long enough for migration to consume them. Deserialization is lenient:
//! every field the old platform ever left out defaults, so years of stored
//! documents parse without fixups.

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::block::{FieldType, HAlign, VAlign};

/// Value kind of a legacy positioned field. The old schema only ever placed
/// text and signature boxes on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LegacyFieldType {
    #[default]
    Text,
    Signature,
}

impl From<LegacyFieldType> for FieldType {
    fn from(t: LegacyFieldType) -> Self {
        match t {
            LegacyFieldType::Text => FieldType::Text,
            LegacyFieldType::Signature => FieldType::Signature,
        }
    }
}

/// Value kind of a legacy phantom field. Phantoms carried the data-only
/// kinds: routing emails and computed parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PhantomFieldType {
    #[default]
    Text,
    Email,
    Computed,
}

impl From<PhantomFieldType> for FieldType {
    fn from(t: PhantomFieldType) -> Self {
        match t {
            PhantomFieldType::Text => FieldType::Text,
            PhantomFieldType::Email => FieldType::Email,
            PhantomFieldType::Computed => FieldType::Computed,
        }
    }
}

/// A v0 field definition: identity, descriptors, geometry, party by name.
///
/// A zero width or height means the designer parked the field off-document;
/// migration classifies those as phantom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyField {
    pub field: String,
    #[serde(rename = "type", default)]
    pub field_type: LegacyFieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Free-text party name; resolved against `required_parties`.
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub validator: Option<String>,
    #[serde(default)]
    pub prefiller: Option<String>,

    // Geometry
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub page: u32,
    #[serde(default)]
    pub align_h: Option<HAlign>,
    #[serde(default)]
    pub align_v: Option<VAlign>,
}

/// A v0 phantom field: no geometry, ever.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyPhantomField {
    pub field: String,
    #[serde(rename = "type", default)]
    pub field_type: PhantomFieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub validator: Option<String>,
    #[serde(default)]
    pub prefiller: Option<String>,
}

/// Declares that a named party must sign, and in which position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPartyRequirement {
    pub party: String,
    pub order: u32,
}

/// A v0 signatory record. `field` associates the contact with a party by
/// naming convention (`student.signature` belongs to "student").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySignatory {
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub honorific: Option<String>,
    pub field: String,
}

/// A v0 subscriber record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySubscriber {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

/// A complete v0 document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    /// Raw stored value; 0 for every real v0 document. Kept as written so
    /// routing can report what it actually saw.
    pub schema_version: i64,
    #[serde(default)]
    pub schema: Vec<LegacyField>,
    #[serde(default)]
    pub schema_phantoms: Vec<LegacyPhantomField>,
    #[serde(default)]
    pub required_parties: Vec<LegacyPartyRequirement>,
    #[serde(default)]
    pub signatories: Vec<LegacySignatory>,
    #[serde(default)]
    pub subscribers: Vec<LegacySubscriber>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_field_parses() {
        let field: LegacyField = serde_json::from_value(serde_json::json!({
            "field": "student.name",
            "x": 10, "y": 20, "w": 100, "h": 12, "page": 1
        }))
        .unwrap();
        assert_eq!(field.field, "student.name");
        assert_eq!(field.field_type, LegacyFieldType::Text);
        assert_eq!(field.label, "");
        assert!(field.party.is_none());
        assert!(!field.shared);
    }

    #[test]
    fn test_full_field_parses() {
        let field: LegacyField = serde_json::from_value(serde_json::json!({
            "field": "entity.legal-name",
            "type": "text",
            "label": "Legal name",
            "tooltip": "As registered",
            "source": "entity",
            "party": "entity",
            "shared": true,
            "validator": "len > 0",
            "prefiller": "entity.name",
            "x": 72.5, "y": 640.0, "w": 180.0, "h": 14.0, "page": 2,
            "align_h": "left", "align_v": "middle"
        }))
        .unwrap();
        assert_eq!(field.tooltip.as_deref(), Some("As registered"));
        assert_eq!(field.party.as_deref(), Some("entity"));
        assert_eq!(field.align_h, Some(HAlign::Left));
        assert_eq!(field.page, 2);
    }

    #[test]
    fn test_legacy_field_type_conversion() {
        assert_eq!(FieldType::from(LegacyFieldType::Signature), FieldType::Signature);
        assert_eq!(FieldType::from(PhantomFieldType::Email), FieldType::Email);
        assert_eq!(FieldType::from(PhantomFieldType::Computed), FieldType::Computed);
    }

    #[test]
    fn test_signature_type_parses() {
        let field: LegacyField = serde_json::from_value(serde_json::json!({
            "field": "student.signature",
            "type": "signature",
            "x": 0, "y": 0, "w": 0, "h": 0, "page": 1
        }))
        .unwrap();
        assert_eq!(field.field_type, LegacyFieldType::Signature);
    }

    #[test]
    fn test_minimal_document_parses() {
        let doc: LegacyDocument = serde_json::from_value(serde_json::json!({
            "schema_version": 0
        }))
        .unwrap();
        assert_eq!(doc.schema_version, 0);
        assert!(doc.schema.is_empty());
        assert!(doc.schema_phantoms.is_empty());
        assert!(doc.required_parties.is_empty());
        assert!(doc.signatories.is_empty());
        assert!(doc.subscribers.is_empty());
    }

    #[test]
    fn test_phantom_field_has_no_geometry_keys() {
        let phantom: LegacyPhantomField = serde_json::from_value(serde_json::json!({
            "field": "tor.email",
            "type": "email"
        }))
        .unwrap();
        assert_eq!(phantom.field_type, PhantomFieldType::Email);

        let value = serde_json::to_value(&phantom).unwrap();
        assert!(value.get("x").is_none());
    }

    #[test]
    fn test_signatory_parses() {
        let s: LegacySignatory = serde_json::from_value(serde_json::json!({
            "name": "Dr. Quinn",
            "email": "a@x.com",
            "title": "Director",
            "field": "student.signature"
        }))
        .unwrap();
        assert_eq!(s.field, "student.signature");
        assert!(s.honorific.is_none());
    }
}
