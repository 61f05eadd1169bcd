//! Schema version sniffing and migrate-on-read routing.
//!
//! Stored documents arrive as raw JSON of unknown vintage. The predicates
//! here look at shape only, without deserializing, so callers can route
//! cheaply; [`auto_migrate_form_metadata`] does the full parse-and-upgrade
//! in one call.

use serde_json::Value;

use praxis_types::{FormDocument, LegacyDocument};

use crate::Result;
use crate::error::MigrateError;
use crate::migrate::migrate_form_metadata_with_report;
use crate::options::MigrationOptions;
use crate::report::MigrationReport;

/// Whether a raw JSON value looks like a v0 (flat) form document.
///
/// All four top-level shapes must line up: `schema_version` 0 plus `schema`,
/// `required_parties`, and `signatories` arrays. A value with a malformed
/// list is not v0; it gets rejected at routing instead of half-parsed.
pub fn is_form_metadata_v0(value: &Value) -> bool {
    value.get("schema_version").and_then(Value::as_i64) == Some(0)
        && value.get("schema").is_some_and(Value::is_array)
        && value.get("required_parties").is_some_and(Value::is_array)
        && value.get("signatories").is_some_and(Value::is_array)
}

/// Whether a raw JSON value looks like a v1 (block) form document.
pub fn is_form_metadata_v1(value: &Value) -> bool {
    value.get("schema_version").and_then(Value::as_i64) == Some(1)
        && value
            .pointer("/schema/blocks")
            .is_some_and(Value::is_array)
        && value.get("signing_parties").is_some_and(Value::is_array)
}

/// Parse a stored document of either version, migrating v0 on the way in.
///
/// v1 input deserializes untouched. Anything that matches neither shape is
/// rejected rather than guessed at.
pub fn auto_migrate_form_metadata(value: Value, options: &MigrationOptions) -> Result<FormDocument> {
    auto_migrate_form_metadata_with_report(value, options).map(|(document, _)| document)
}

/// [`auto_migrate_form_metadata`], plus the migration report. A v1
/// passthrough yields an empty report.
pub fn auto_migrate_form_metadata_with_report(
    value: Value,
    options: &MigrationOptions,
) -> Result<(FormDocument, MigrationReport)> {
    if is_form_metadata_v1(&value) {
        let document: FormDocument = serde_json::from_value(value)?;
        let report = MigrationReport {
            document: document.name.clone(),
            warnings: Vec::new(),
        };
        return Ok((document, report));
    }
    if is_form_metadata_v0(&value) {
        let legacy: LegacyDocument = serde_json::from_value(value)?;
        return migrate_form_metadata_with_report(legacy, options);
    }
    Err(MigrateError::UnknownSchemaVersion {
        version: value
            .get("schema_version")
            .map(|v| v.to_string())
            .unwrap_or_else(|| "missing".to_string()),
    })
}
