//! Command implementations.
//!
//! Offline commands (`fields`, `automap`, `preview`) read sample documents
//! from disk. Remote commands (`schema`, `test`, `save`, `connections`) go
//! through [`TowerClient`].

pub mod automap;
pub mod connections;
pub mod fields;
pub mod preview;
pub mod save;
pub mod schema;
pub mod test_mappings;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tower_client::TowerClient;
use tower_config::Config;
use tower_mapping::{
    ExportEntry, FieldDescriptor, MappingStore, ValidationWarning, auto_map, export_entries,
    extract_pair, import_entries, missing_required, parse_export,
};
use tracing::info;

use crate::args::RemoteMappingArgs;

/// Read and parse a JSON file.
pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Read an exported mapping list.
pub(crate) fn read_export(path: &Path) -> Result<Vec<ExportEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_export(&content).with_context(|| format!("Invalid mapping file {}", path.display()))
}

pub(crate) fn build_client(config: &Config) -> Result<TowerClient> {
    TowerClient::builder()
        .from_config(config)
        .build()
        .context("Failed to build Tower client")
}

/// Fetch the schema for `args` and load the mapping set to send.
pub(crate) async fn remote_session(
    client: &TowerClient,
    args: &RemoteMappingArgs,
    max_depth: usize,
) -> Result<MappingSession> {
    let schema = client
        .get_schema(&args.source_type, &args.target_type)
        .await
        .context("Failed to fetch schema")?;
    let mut session =
        MappingSession::from_documents(&schema.source_fields, &schema.target_fields, max_depth)?;
    session.populate(args.mappings.as_deref(), &schema.mappings)?;
    Ok(session)
}

/// Field lists of one source/target pair plus the mappings between them.
pub(crate) struct MappingSession {
    pub source_fields: Vec<FieldDescriptor>,
    pub target_fields: Vec<FieldDescriptor>,
    pub store: MappingStore,
}

impl MappingSession {
    pub(crate) fn from_documents(source: &Value, target: &Value, max_depth: usize) -> Result<Self> {
        let (source_fields, target_fields) = extract_pair(source, target, max_depth)?;
        Ok(Self {
            source_fields,
            target_fields,
            store: MappingStore::new(),
        })
    }

    /// Map every still-unmapped target the heuristics can match.
    pub(crate) fn auto_map(&mut self) -> usize {
        let proposals = auto_map(
            &self.source_fields,
            &self.target_fields,
            self.store.mappings(),
        );
        self.store.apply_proposals(proposals).len()
    }

    /// Load exported entries. Entries whose paths no longer exist are skipped
    /// with a warning.
    pub(crate) fn load(&mut self, entries: &[ExportEntry]) -> usize {
        let outcome = import_entries(entries, &self.source_fields, &self.target_fields);
        for entry in &outcome.unresolved {
            eprintln!(
                "Warning: skipping mapping {} -> {}: field not found",
                entry.source_path, entry.target_path
            );
        }
        self.store.apply_proposals(outcome.proposals).len()
    }

    /// Use the mappings from `file` when given, else `saved`, else auto-map.
    pub(crate) fn populate(&mut self, file: Option<&Path>, saved: &[ExportEntry]) -> Result<()> {
        let count = match file {
            Some(path) => {
                let entries = read_export(path)?;
                self.load(&entries)
            }
            None if !saved.is_empty() => self.load(saved),
            None => self.auto_map(),
        };
        info!(mappings = count, "Mappings loaded");
        Ok(())
    }

    pub(crate) fn entries(&self) -> Result<Vec<ExportEntry>> {
        Ok(export_entries(
            self.store.mappings(),
            &self.source_fields,
            &self.target_fields,
        )?)
    }

    /// Required target fields nothing maps onto, reported on stderr.
    pub(crate) fn report_warnings(&self) -> Vec<ValidationWarning> {
        let warnings = missing_required(&self.target_fields, self.store.mappings());
        for warning in &warnings {
            eprintln!("Warning: {}", warning);
        }
        warnings
    }
}
