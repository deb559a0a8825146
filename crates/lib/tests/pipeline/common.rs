//! Shared helpers for pipeline integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use assetpipe_lib::config::Config;
use assetpipe_lib::pipeline::Outcome;
use assetpipe_lib::types::Variables;
use serde_json::Value;
use tempfile::TempDir;

pub const UPLOADS_URL: &str = "https://example.com/uploads";

/// Isolated source tree and uploads directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn config(&self) -> Config {
    Config::with_uploads(self.temp.path().join("uploads"), UPLOADS_URL)
  }

  pub fn debug_config(&self) -> Config {
    Config {
      debug: true,
      ..self.config()
    }
  }

  /// Writes `content` to `rel` under the source tree and returns its path.
  pub fn write(&self, rel: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join("src").join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
  }

  pub fn store_dir(&self) -> PathBuf {
    self.temp.path().join("uploads").join("compiled-scss-and-js")
  }

  /// Sorted file names in the store.
  pub fn artifacts(&self) -> Vec<String> {
    let Ok(entries) = fs::read_dir(self.store_dir()) else {
      return Vec::new();
    };
    let mut names: Vec<String> = entries
      .map(|e| e.unwrap().file_name().into_string().unwrap())
      .collect();
    names.sort();
    names
  }
}

pub fn source(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}

pub fn vars(value: Value) -> Variables {
  match value {
    Value::Object(map) => map,
    other => panic!("expected a JSON object, got {other}"),
  }
}

/// Moves a file's modification time forward by `secs` seconds.
pub fn touch_forward(path: &Path, secs: u64) {
  let current = fs::metadata(path).unwrap().modified().unwrap();
  let file = fs::File::options().write(true).open(path).unwrap();
  file.set_modified(current + Duration::from_secs(secs)).unwrap();
}

/// The registered artifact's file name, panicking on `Unavailable`.
pub fn artifact_name(outcome: &Outcome) -> String {
  outcome.artifact().expect("asset should be registered").name.clone()
}

/// Switches the process working directory until dropped.
pub struct CurrentDirGuard {
  previous: PathBuf,
}

impl CurrentDirGuard {
  pub fn change_to(dir: &Path) -> Self {
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir).unwrap();
    Self { previous }
  }
}

impl Drop for CurrentDirGuard {
  fn drop(&mut self) {
    let _ = std::env::set_current_dir(&self.previous);
  }
}
