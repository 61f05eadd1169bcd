//! Praxis form-schema migration tool.
//!
//! Usage:
//!   # Upgrade v0 documents, writing <name>.v1.json next to each input
//!   cargo run -p praxis-cli -- convert forms/*.json
//!
//!   # Collect output elsewhere, pinning ids for a known form
//!   cargo run -p praxis-cli -- convert --out-dir out/ \
//!       --party-ids name --party student=party-intern forms/moa.json
//!
//!   # Report stored schema versions without writing anything
//!   cargo run -p praxis-cli -- inspect forms/*.json

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{EnvFilter, fmt};

use praxis_form::{
    AccountIdStrategy, MigrationOptions, PartyIdStrategy, auto_migrate_form_metadata_with_report,
    is_form_metadata_v0, is_form_metadata_v1,
};

/// Form schema migration for Praxis documents.
#[derive(Parser, Debug)]
#[command(name = "praxis")]
#[command(about = "Migrate Praxis form documents to the block schema")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upgrade v0 documents to the v1 block schema
    Convert {
        /// Input documents (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory for converted output; defaults next to each input
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Party id strategy: index, name, or uuid
        #[arg(long, default_value = "index")]
        party_ids: String,

        /// Account id strategy: email-hash, uuid, or email
        #[arg(long, default_value = "email-hash")]
        account_ids: String,

        /// Pin a party id, NAME=ID (repeatable)
        #[arg(long = "party", value_name = "NAME=ID")]
        party: Vec<String>,

        /// Pin an account id, KEY=ID (repeatable)
        #[arg(long = "account", value_name = "KEY=ID")]
        account: Vec<String>,

        /// Drop labels, tooltips, validators, and prefillers
        #[arg(long)]
        strip_descriptors: bool,

        /// Pretty-print output JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Report the stored schema version of each document
    Inspect {
        /// Input documents (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Log to stderr so stdout stays clean for inspect output.
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Convert {
            files,
            out_dir,
            party_ids,
            account_ids,
            party,
            account,
            strip_descriptors,
            pretty,
        } => {
            let options =
                migration_options(&party_ids, &account_ids, &party, &account, strip_descriptors)?;
            cmd_convert(&files, out_dir.as_deref(), &options, pretty)
        }
        Command::Inspect { files } => cmd_inspect(&files),
    }
}

fn migration_options(
    party_ids: &str,
    account_ids: &str,
    party: &[String],
    account: &[String],
    strip_descriptors: bool,
) -> Result<MigrationOptions> {
    let Some(party_id_strategy) = PartyIdStrategy::from_str(party_ids) else {
        bail!("unknown party id strategy: {party_ids}");
    };
    let Some(account_id_strategy) = AccountIdStrategy::from_str(account_ids) else {
        bail!("unknown account id strategy: {account_ids}");
    };
    Ok(MigrationOptions {
        party_id_strategy,
        account_id_strategy,
        preserve_descriptors: !strip_descriptors,
        party_mapping: parse_mappings(party)?,
        account_mapping: parse_mappings(account)?,
    })
}

fn parse_mappings(pairs: &[String]) -> Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("mapping must be NAME=ID, got {pair:?}"))
        })
        .collect()
}

fn cmd_convert(
    files: &[PathBuf],
    out_dir: Option<&Path>,
    options: &MigrationOptions,
    pretty: bool,
) -> Result<()> {
    let mut failed = 0usize;
    for path in files {
        match convert_file(path, out_dir, options, pretty) {
            Ok(out) => tracing::info!(input = %path.display(), output = %out.display(), "converted"),
            Err(error) => {
                tracing::error!(input = %path.display(), "conversion failed: {error:#}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} documents failed to convert", files.len());
    }
    Ok(())
}

fn convert_file(
    path: &Path,
    out_dir: Option<&Path>,
    options: &MigrationOptions,
    pretty: bool,
) -> Result<PathBuf> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    // Warnings are logged as they are recorded; surface just the count here.
    let (document, report) = auto_migrate_form_metadata_with_report(value, options)?;
    if !report.is_clean() {
        tracing::warn!(
            document = %report.document,
            warnings = report.warnings.len(),
            "converted with warnings"
        );
    }

    let out = output_path(path, out_dir);
    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    fs::write(&out, json).with_context(|| format!("writing {}", out.display()))?;
    Ok(out)
}

/// `forms/moa.json` converts to `moa.v1.json`, beside the input unless an
/// output directory was given.
fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("form");
    let name = format!("{stem}.v1.json");
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

fn cmd_inspect(files: &[PathBuf]) -> Result<()> {
    for path in files {
        let raw =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let value: Value =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        println!("{:<48} {}", path.display(), describe(&value));
    }
    Ok(())
}

fn describe(value: &Value) -> String {
    if is_form_metadata_v1(value) {
        let blocks = value
            .pointer("/schema/blocks")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let parties = value
            .get("signing_parties")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        format!("v1  {blocks:>3} blocks    {parties} parties")
    } else if is_form_metadata_v0(value) {
        let fields = value
            .get("schema")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let phantoms = value
            .get("schema_phantoms")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        format!("v0  {fields:>3} fields    {phantoms} phantoms")
    } else {
        "unknown schema version".to_string()
    }
}
