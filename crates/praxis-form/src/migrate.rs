//! v0 to v1 migration orchestration.
//!
//! All per-run state (the block id counter, the party name map, the
//! account cache, the warning list) lives in a [`MigrationCx`] constructed
//! fresh for every document and dropped when `migrate` returns. Nothing
//! leaks between documents, so a batch is just a loop.

use std::collections::HashMap;

use praxis_types::{
    AccountId, BlockId, BlockSchema, BlockType, CURRENT_SCHEMA_VERSION, FormDocument,
    LegacyDocument, PartyId, SigningParty, Subscriber,
};

use crate::account::resolve_account_id;
use crate::builder::build_blocks;
use crate::error::MigrateError;
use crate::options::{MigrationOptions, PartyIdStrategy};
use crate::party::{resolve_parties, slug};
use crate::report::{BatchFailure, BatchReport, MigrationReport, MigrationWarning};
use crate::version::is_form_metadata_v1;
use crate::Result;

/// Per-run migration state. Never shared across documents.
pub(crate) struct MigrationCx<'a> {
    pub(crate) options: &'a MigrationOptions,
    block_counter: u64,
    /// Party name -> id, in registration order. Party counts are tiny, so
    /// a vector keeps lookups simple and registration order free.
    parties: Vec<(String, PartyId)>,
    /// Ids minted for names outside the requirements list, in mint order.
    minted: Vec<PartyId>,
    /// Contact key -> id. Makes every strategy, uuid included, resolve a
    /// given key exactly once per run.
    accounts: HashMap<String, AccountId>,
    warnings: Vec<MigrationWarning>,
}

impl<'a> MigrationCx<'a> {
    pub(crate) fn new(options: &'a MigrationOptions) -> Self {
        Self {
            options,
            block_counter: 0,
            parties: Vec::new(),
            minted: Vec::new(),
            accounts: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Mint the next block id: `block-<kind>-<counter>`.
    pub(crate) fn next_block_id(&mut self, block_type: BlockType) -> BlockId {
        let id = BlockId::mint(block_type.as_str(), self.block_counter);
        self.block_counter += 1;
        id
    }

    /// Party id for a name: mapping entry verbatim, else by strategy.
    pub(crate) fn mint_party_id(&self, name: &str, index: usize) -> PartyId {
        if let Some(mapped) = self.options.party_mapping.get(name) {
            return PartyId::new(mapped.as_str());
        }
        match self.options.party_id_strategy {
            PartyIdStrategy::Index => PartyId::new(format!("party-{index}")),
            PartyIdStrategy::Name => PartyId::new(format!("party-{}", slug(name))),
            PartyIdStrategy::Uuid => PartyId::new(format!("party-{}", uuid::Uuid::new_v4())),
        }
    }

    pub(crate) fn register_party(&mut self, name: &str, id: PartyId) {
        self.parties.push((name.to_string(), id));
    }

    pub(crate) fn registered_party(&self, name: &str) -> Option<&PartyId> {
        self.parties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| id)
    }

    /// Resolve a field's party name. Total: an empty or missing name is the
    /// unknown sentinel; an undeclared name mints a fresh party on the spot
    /// and leaves a warning behind.
    pub(crate) fn field_party(&mut self, party: Option<&str>, field: &str) -> PartyId {
        let name = match party {
            None | Some("") => return PartyId::unknown(),
            Some(name) => name,
        };
        if let Some(id) = self.registered_party(name) {
            return id.clone();
        }
        let id = self.mint_party_id(name, self.parties.len());
        self.register_party(name, id.clone());
        self.minted.push(id.clone());
        self.warn(MigrationWarning::UnknownFieldParty {
            field: field.to_string(),
            party: name.to_string(),
        });
        id
    }

    /// Account id for a contact key, resolved once per run.
    pub(crate) fn account_id(&mut self, key: &str, email: &str) -> AccountId {
        if let Some(id) = self.accounts.get(key) {
            return id.clone();
        }
        let id = resolve_account_id(key, email, self.options);
        self.accounts.insert(key.to_string(), id.clone());
        id
    }

    pub(crate) fn warn(&mut self, warning: MigrationWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    fn take_minted(&mut self) -> Vec<PartyId> {
        std::mem::take(&mut self.minted)
    }

    pub(crate) fn into_warnings(self) -> Vec<MigrationWarning> {
        self.warnings
    }
}

/// Migrate a v0 document to the v1 block schema.
///
/// Pure in inputs and options: same legacy document plus same options gives
/// byte-identical output, unless a `uuid` strategy is selected. Returns a
/// complete valid document or an error, never a half-migrated one.
pub fn migrate_form_metadata(
    legacy: LegacyDocument,
    options: &MigrationOptions,
) -> Result<FormDocument> {
    migrate_form_metadata_with_report(legacy, options).map(|(document, _)| document)
}

/// [`migrate_form_metadata`], plus the warning report for review.
pub fn migrate_form_metadata_with_report(
    legacy: LegacyDocument,
    options: &MigrationOptions,
) -> Result<(FormDocument, MigrationReport)> {
    if legacy.schema_version != 0 {
        return Err(MigrateError::InvalidInputShape {
            reason: format!("schema_version is {}, expected 0", legacy.schema_version),
        });
    }

    let mut cx = MigrationCx::new(options);

    let mut parties = resolve_parties(&legacy.required_parties, &legacy.signatories, &mut cx);
    let blocks = build_blocks(&legacy.schema, &legacy.schema_phantoms, &mut cx);

    // Parties minted for field names outside the requirements list join the
    // roster at the end, unsigned and unbound. Orders saturate rather than
    // wrap when a declared order sits at the top of the range.
    let mut next_order = parties.iter().map(|p| p.order).max().unwrap_or(0);
    for id in cx.take_minted() {
        next_order = next_order.saturating_add(1);
        parties.push(SigningParty::new(id, next_order));
    }

    let subscribers = legacy
        .subscribers
        .into_iter()
        .map(|s| {
            let key = format!("subscriber-{}", s.email);
            let account_id = cx.account_id(&key, &s.email);
            Subscriber {
                account_id,
                name: s.name,
                email: s.email,
            }
        })
        .collect();

    let document = FormDocument {
        name: legacy.name.clone(),
        label: legacy.label,
        schema_version: CURRENT_SCHEMA_VERSION,
        schema: BlockSchema { blocks },
        signing_parties: parties,
        subscribers,
    };

    // Post-check: the output must read back as v1 and hold its invariants.
    // A failure here is a bug in this module, surfaced loudly.
    let value = serde_json::to_value(&document)?;
    if !is_form_metadata_v1(&value) {
        return Err(MigrateError::PostMigrationInvariant {
            reason: "output failed the v1 shape check".to_string(),
        });
    }
    document
        .validate()
        .map_err(|e| MigrateError::PostMigrationInvariant {
            reason: e.to_string(),
        })?;

    let report = MigrationReport {
        document: legacy.name,
        warnings: cx.into_warnings(),
    };
    Ok((document, report))
}

/// Migrate many documents, isolating failures.
///
/// Each document gets a fresh context; a failure is recorded and the batch
/// moves on.
pub fn migrate_form_metadata_batch(
    documents: Vec<LegacyDocument>,
    options: &MigrationOptions,
) -> BatchReport {
    let mut batch = BatchReport::default();
    for legacy in documents {
        let name = legacy.name.clone();
        match migrate_form_metadata_with_report(legacy, options) {
            Ok((document, report)) => {
                batch.documents.push(document);
                batch.reports.push(report);
            }
            Err(error) => {
                tracing::warn!(document = %name, %error, "migration failed, continuing batch");
                batch.failures.push(BatchFailure {
                    document: name,
                    error,
                });
            }
        }
    }
    batch
}
