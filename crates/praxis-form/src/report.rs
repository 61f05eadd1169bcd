//! Migration reports: warnings, per-document attribution, batch outcomes.

use praxis_types::FormDocument;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::MigrateError;

/// A non-fatal anomaly noticed during migration. Reviewable, never aborts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MigrationWarning {
    /// Several signatories matched one party requirement; the first won.
    #[error("party '{party}': multiple matching signatories, kept '{kept}', ignored {ignored:?}")]
    AmbiguousSignatory {
        party: String,
        kept: String,
        ignored: Vec<String>,
    },

    /// A signatory record matched no party requirement.
    #[error("signatory '{field}' ({email}) matched no required party")]
    UnmatchedSignatory { field: String, email: String },

    /// A field named a party the document never declared; a fresh party
    /// was minted for it.
    #[error("field '{field}' references undeclared party '{party}'")]
    UnknownFieldParty { field: String, party: String },
}

/// What one document's migration produced besides the document itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MigrationReport {
    /// `name` of the source document, for batch attribution.
    pub document: String,
    pub warnings: Vec<MigrationWarning>,
}

impl MigrationReport {
    /// No warnings at all.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A document that failed to migrate. The rest of the batch proceeds.
#[derive(Debug)]
pub struct BatchFailure {
    pub document: String,
    pub error: MigrateError,
}

/// Outcome of a batch run: migrated documents plus isolated failures.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<FormDocument>,
    /// One report per entry in `documents`, same order.
    pub reports: Vec<MigrationReport>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Everything migrated, nothing to review.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.reports.iter().all(MigrationReport::is_clean)
    }

    /// Total warnings across all migrated documents.
    pub fn warning_count(&self) -> usize {
        self.reports.iter().map(|r| r.warnings.len()).sum()
    }
}
