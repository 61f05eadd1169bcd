//! Form schema migration and block grouping for Praxis.
//!
//! Converts the flat v0 field definitions stored by the old platform into
//! the v1 block document model, and derives the logical field groups the
//! form editor works on.
//!
//! # Migration
//!
//! [`migrate_form_metadata`] takes a parsed [`LegacyDocument`] and produces
//! a complete [`FormDocument`] or an error, never a partial result:
//!
//! - Positioned fields become `form_field` blocks in reading order.
//! - Zero-area fields and declared phantoms become a `form_phantom_field`
//!   tail ordered from [`PHANTOM_ORDER_BASE`].
//! - `required_parties` become [`SigningParty`] rows; signatory contacts
//!   bind to parties by field-name convention.
//! - Contact emails resolve to account ids via the configured
//!   [`AccountIdStrategy`], `account-` plus a truncated SHA-256 by default.
//!
//! Migration is deterministic for every strategy except `uuid`: the same
//! input and options always produce the same output. Callers that read
//! stored documents of unknown vintage go through
//! [`auto_migrate_form_metadata`], which sniffs the version and upgrades
//! v0 on the way in.
//!
//! # Grouping
//!
//! [`rebuild_groups`] derives a [`GroupIndex`] from a block list: one group
//! per text block, one per (field name, party, block type) among field
//! blocks. [`apply_group_update`] and [`remove_group`] edit through a
//! group and return a new block list; the index is always rebuilt from the
//! result, never patched.
//!
//! [`LegacyDocument`]: praxis_types::LegacyDocument
//! [`FormDocument`]: praxis_types::FormDocument
//! [`SigningParty`]: praxis_types::SigningParty

mod account;
mod builder;
mod classify;
mod error;
mod groups;
mod migrate;
mod options;
mod party;
mod report;
mod version;

pub use account::resolve_account_id;
pub use builder::PHANTOM_ORDER_BASE;
pub use classify::{FieldClass, classify};
pub use error::MigrateError;
pub use groups::{
    BlockGroup, FieldUpdate, GroupIndex, apply_group_update, rebuild_groups, remove_group,
};
pub use migrate::{
    migrate_form_metadata, migrate_form_metadata_batch, migrate_form_metadata_with_report,
};
pub use options::{AccountIdStrategy, MigrationOptions, PartyIdStrategy};
pub use report::{BatchFailure, BatchReport, MigrationReport, MigrationWarning};
pub use version::{
    auto_migrate_form_metadata, auto_migrate_form_metadata_with_report, is_form_metadata_v0,
    is_form_metadata_v1,
};

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
