//! Content hashing for change detection.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// SHA-256 hex digest of the JSON serialization of `value`.
///
/// Used to tell whether a mapping set changed since it was last sent to the
/// test endpoint. Serialization is deterministic for the crate's types, so
/// equal values always hash equal.
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
