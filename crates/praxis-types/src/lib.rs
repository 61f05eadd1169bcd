//! Form document model for Praxis.
//!
//! This crate is the data foundation: typed ids, blocks, signing parties,
//! and the legacy v0 records migration consumes. It has **no internal
//! praxis dependencies**: a pure leaf crate that other crates build on.
//!
//! # Entity-Relationship Overview
//!
//! ```text
//! FormDocument (v1) ← one signable form template
//!     └── schema.blocks: ordered Block list
//!     └── signing_parties: SigningParty (order + optional bound account)
//!     └── subscribers: Subscriber (receives, never signs)
//!
//! Block (BlockId) ← one unit of document structure
//!     └── signing_party_id → SigningParty._id, or "unknown"
//!     └── payload: text_content | field_schema | phantom_field_schema
//!
//! LegacyDocument (v0) ← migration input, discarded afterwards
//!     └── schema: flat LegacyField list (geometry + party names)
//!     └── schema_phantoms / required_parties / signatories / subscribers
//! ```
//!
//! # Key Types
//!
//! |------------------------|---------------------------------------------|
//! | Type                   | Purpose                                     |
//! |------------------------|---------------------------------------------|
//! | [`FormDocument`]       | Complete v1 document (+ invariant checks)   |
//! | [`Block`]              | Header/paragraph/field unit                 |
//! | [`FieldSchema`]        | Positioned field payload (page box)         |
//! | [`PhantomFieldSchema`] | Data-only field payload (no geometry)       |
//! | [`SigningParty`]       | Who must sign, in what order                |
//! | [`BlockId`]            | `block-<kind>-<counter>` identifier         |
//! | [`PartyId`]            | Party identifier, `"unknown"` sentinel      |
//! | [`AccountId`]          | Stable contact identity                     |
//! | [`LegacyDocument`]     | v0 input shape, leniently deserialized      |
//! |------------------------|---------------------------------------------|

pub mod block;
pub mod document;
pub mod ids;
pub mod legacy;

// Re-export primary types at crate root for convenience.
pub use block::{
    Block, BlockType, FieldSchema, FieldType, HAlign, PhantomFieldSchema, VAlign,
};
pub use document::{
    BlockSchema, CURRENT_SCHEMA_VERSION, FormDocument, InvariantViolation, SignatoryAccount,
    SigningParty, Subscriber,
};
pub use ids::{AccountId, BlockId, PartyId};
pub use legacy::{
    LegacyDocument, LegacyField, LegacyFieldType, LegacyPartyRequirement, LegacyPhantomField,
    LegacySignatory, LegacySubscriber, PhantomFieldType,
};
