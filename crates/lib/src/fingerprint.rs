//! Staleness signals for sources and variables.
//!
//! This module provides:
//! - `directory_fingerprint()`: sum of file modification times under a directory
//! - `file_fingerprint()`: modification time of a single file
//! - `variables_fingerprint()`: 32-bit checksum of the canonical variables
//!
//! None of these are cryptographic identities. Two different trees can sum
//! to the same value; they only need to change when the inputs change.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;
use walkdir::WalkDir;

use crate::types::Variables;

/// Sum of the modification times (whole seconds since the epoch) of every
/// file under `path`, subdirectories included.
///
/// Returns 0 when `path` does not exist or is not a directory. Symlinks are
/// followed; entries that cannot be read, and symlink loops, are skipped.
pub fn directory_fingerprint(path: &Path) -> u64 {
  if !path.is_dir() {
    return 0;
  }

  let mut total: u64 = 0;

  for entry in WalkDir::new(path).follow_links(true).min_depth(1) {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        debug!(root = ?path, error = %e, "skipping unreadable entry");
        continue;
      }
    };

    if entry.file_type().is_dir() {
      continue;
    }

    match entry.metadata() {
      Ok(meta) => total = total.wrapping_add(mtime_secs(meta.modified().ok())),
      Err(e) => debug!(path = ?entry.path(), error = %e, "skipping entry without metadata"),
    }
  }

  total
}

/// Modification time of a single file in whole seconds since the epoch, or 0
/// if the file does not exist.
pub fn file_fingerprint(path: &Path) -> u64 {
  mtime_secs(fs::metadata(path).and_then(|meta| meta.modified()).ok())
}

fn mtime_secs(modified: Option<SystemTime>) -> u64 {
  modified
    .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
    .map(|duration| duration.as_secs())
    .unwrap_or(0)
}

/// 32-bit checksum of the canonical serialization of `variables`.
///
/// Keys are sorted at every nesting level before serializing, so two maps
/// with the same entries always produce the same fingerprint regardless of
/// insertion order.
pub fn variables_fingerprint(variables: &Variables) -> u32 {
  let canonical = canonicalize(&Value::Object(variables.clone()));
  let serialized = canonical.to_string();

  let digest = Sha256::digest(serialized.as_bytes());
  u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Rebuilds every object in `value` with its keys inserted in sorted order.
fn canonicalize(value: &Value) -> Value {
  match value {
    Value::Object(map) => {
      let mut entries: Vec<(&String, &Value)> = map.iter().collect();
      entries.sort_by(|a, b| a.0.cmp(b.0));

      let mut sorted = serde_json::Map::new();
      for (key, value) in entries {
        sorted.insert(key.clone(), canonicalize(value));
      }
      Value::Object(sorted)
    }
    Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
    other => other.clone(),
  }
}
