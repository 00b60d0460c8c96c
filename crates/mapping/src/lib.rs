//! Field mapping logic for Tower connections.
//!
//! This crate turns sample JSON documents into flat field descriptors,
//! keeps an editable list of source-to-target mappings with undo, proposes
//! mappings heuristically and builds the payloads the remote mapping API
//! expects. It performs no I/O; the HTTP side lives in `tower-client`.

pub mod automap;
pub mod error;
pub mod export;
pub mod extract;
pub mod field;
pub mod hash;
pub mod payload;
pub mod preview;
pub mod store;
pub mod transform;
pub mod validate;

pub use automap::{MappingProposal, auto_map};
pub use error::{MappingError, Result, TransformError};
pub use export::{ExportEntry, ImportOutcome, export_json, export_entries, import_entries, parse_export};
pub use extract::{DEFAULT_MAX_DEPTH, FieldExtractor, REQUIRED_TARGET_KEYS, extract_pair};
pub use field::{FieldDescriptor, FieldId, FieldType, Primitive, Side};
pub use hash::content_hash;
pub use payload::{MappingMetadata, SaveMappingsPayload, SavedMappingEntry, TestMappingsRequest};
pub use preview::{LocalPreview, PreviewNote, render};
pub use store::{Mapping, MappingId, MappingStore};
pub use transform::{TransformId, TransformInfo, catalog, lookup};
pub use validate::{ValidationWarning, missing_required};
