//! Test utilities for assetpipe-lib.

use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::types::Variables;

/// Sets a file's modification time to `secs` seconds after the epoch.
pub fn set_mtime(path: &Path, secs: u64) {
  let file = File::options().write(true).open(path).unwrap();
  file.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
}

/// Pushes a file's modification time forward by `secs` seconds.
pub fn touch_forward(path: &Path, secs: u64) {
  let current = std::fs::metadata(path).unwrap().modified().unwrap_or(SystemTime::now());
  let file = File::options().write(true).open(path).unwrap();
  file.set_modified(current + Duration::from_secs(secs)).unwrap();
}

/// Builds a `Variables` map from a JSON object literal.
pub fn vars(value: Value) -> Variables {
  match value {
    Value::Object(map) => map,
    other => panic!("expected a JSON object, got {other}"),
  }
}
