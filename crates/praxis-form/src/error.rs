//! Error types for migration and version routing.

use thiserror::Error;

/// Errors that can occur while migrating or routing form documents.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Input to `migrate_form_metadata` is not a v0 document.
    #[error("input is not a v0 form document: {reason}")]
    InvalidInputShape { reason: String },

    /// Value routed through `auto_migrate_form_metadata` is neither v0 nor v1.
    #[error("unrecognized schema version: {version}")]
    UnknownSchemaVersion { version: String },

    /// The freshly migrated document failed its own invariant check.
    ///
    /// This signals a defect in the migrator, not a problem with the input.
    /// Migration returns a complete valid document or nothing.
    #[error("migrated document violates v1 invariants: {reason}")]
    PostMigrationInvariant { reason: String },

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
