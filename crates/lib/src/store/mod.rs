//! The artifact store.
//!
//! A flat directory holding compiled artifacts, their source maps and remote
//! mirrors. There is no manifest: an artifact's name carries the fingerprints
//! it was built from, so its existence alone answers "is it fresh?".
//!
//! # Layout
//!
//! ```text
//! compiled-scss-and-js/
//! ├── <handle>-<file>-<vars>-<dir>.css    # compiled style
//! ├── <handle>-<file>-<vars>-<dir>.map    # optional source map
//! ├── <handle>-<file>-<dir>.js            # minified script
//! └── cached-<sanitized-url>.<ext>        # remote mirror
//! ```

pub mod paths;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use paths::StoragePaths;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to create storage directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to prune '{path}': {source}")]
  Prune {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Flat directory of artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
  dir: PathBuf,
}

impl CacheStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn path_of(&self, name: &str) -> PathBuf {
    self.dir.join(name)
  }

  /// Creates the store directory if it does not exist yet.
  pub fn ensure_dir(&self) -> Result<(), StoreError> {
    if !self.dir.is_dir() {
      fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
        path: self.dir.clone(),
        source,
      })?;
      debug!(dir = ?self.dir, "created storage directory");
    }
    Ok(())
  }

  pub fn exists(&self, name: &str) -> bool {
    self.path_of(name).is_file()
  }

  pub fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
    let path = self.path_of(name);
    fs::read(&path).map_err(|source| StoreError::Read { path, source })
  }

  /// Writes `contents` to `name`, replacing any existing file.
  ///
  /// The bytes go to a temporary file in the store directory which is then
  /// renamed over the destination, so readers see either the old file or the
  /// complete new one.
  pub fn write(&self, name: &str, contents: &[u8]) -> Result<PathBuf, StoreError> {
    self.ensure_dir()?;
    let path = self.path_of(name);
    let write_err = |source: io::Error| StoreError::Write {
      path: path.clone(),
      source,
    };

    let mut temp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
    temp.write_all(contents).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(&path).map_err(|e| write_err(e.error))?;

    debug!(path = ?path, size = contents.len(), "wrote artifact");
    Ok(path)
  }

  /// Deletes every artifact in `prefix`'s namespace with extension `ext`,
  /// together with its `.map` sibling, except the artifact named `keep`
  /// (a stem, without extension).
  ///
  /// A file matches when its name is `prefix` followed by one or more
  /// hyphen-separated fingerprints and then `.ext` or `.map`. Mirrors and
  /// unrelated files are never touched. `keep` stays in place so a
  /// concurrent caller that already handed out its URL never sees it
  /// disappear. Returns the deleted paths.
  pub fn prune_matching(&self, prefix: &str, ext: &str, keep: &str) -> Result<Vec<PathBuf>, StoreError> {
    let entries = match fs::read_dir(&self.dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(source) => {
        return Err(StoreError::Prune {
          path: self.dir.clone(),
          source,
        });
      }
    };

    let mut deleted = Vec::new();

    for entry in entries {
      let entry = entry.map_err(|source| StoreError::Prune {
        path: self.dir.clone(),
        source,
      })?;

      let file_name = entry.file_name();
      let Some(name) = file_name.to_str() else {
        continue;
      };
      if !matches_artifact(name, prefix, ext) {
        continue;
      }
      if name.rsplit_once('.').is_some_and(|(stem, _)| stem == keep) {
        continue;
      }

      let path = entry.path();
      match fs::remove_file(&path) {
        Ok(()) => deleted.push(path),
        // Another process pruned it first.
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = ?path, error = %e, "failed to remove stale artifact"),
      }
    }

    if !deleted.is_empty() {
      info!(prefix = %prefix, count = deleted.len(), "pruned stale artifacts");
    }

    Ok(deleted)
  }
}

/// Whether `name` is `<prefix><digits>[-<digits>...].<ext|map>`.
fn matches_artifact(name: &str, prefix: &str, ext: &str) -> bool {
  let Some(rest) = name.strip_prefix(prefix) else {
    return false;
  };
  let Some((stem, suffix)) = rest.rsplit_once('.') else {
    return false;
  };
  if suffix != ext && suffix != "map" {
    return false;
  }

  !stem.is_empty()
    && stem
      .split('-')
      .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}
