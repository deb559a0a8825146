//! Pipeline orchestrators.
//!
//! Each registration runs once, start to finish:
//!
//! ```text
//! resolve → fingerprint → cache check ─ hit ──────────────────────────────→ register
//!                                     └ miss → compile ─ ok → prune → write → register
//!                                                       └ err → report (nothing registered)
//! ```
//!
//! A source that cannot be resolved fails the call with
//! [`PipelineError`]. A compilation failure is reported through `tracing`
//! and the call returns [`Outcome::Unavailable`] instead.

mod scripts;
mod styles;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub use scripts::Scripts;
pub use styles::Styles;

use crate::compile::CompileError;
use crate::fingerprint::{directory_fingerprint, file_fingerprint};
use crate::resolve::ResolveError;
use crate::store::StoreError;
use crate::types::{AssetKind, ResolvedSource};

/// Errors that abort a registration.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Store(#[from] StoreError),
}

impl PipelineError {
  /// Whether the source reference did not point at an existing file.
  pub fn is_not_found(&self) -> bool {
    matches!(self, PipelineError::Resolve(ResolveError::NotFound(_)))
  }
}

/// A compiled artifact in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  pub name: String,
  pub path: PathBuf,
  pub url: String,
  /// Whether the artifact already existed and no compilation ran.
  pub cache_hit: bool,
}

/// Result of a registration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
  /// The asset was handed to the host.
  Registered(Artifact),
  /// Compilation failed; the asset was not registered.
  Unavailable,
}

impl Outcome {
  pub fn artifact(&self) -> Option<&Artifact> {
    match self {
      Outcome::Registered(artifact) => Some(artifact),
      Outcome::Unavailable => None,
    }
  }

  pub fn is_registered(&self) -> bool {
    matches!(self, Outcome::Registered(_))
  }
}

/// Staleness signal for a resolved source.
///
/// Local sources use the directory fingerprint of their parent directory so
/// that edits to imported siblings invalidate the artifact. Remote mirrors
/// live in the store directory itself, whose contents change with every
/// artifact written, so they use their own modification time instead.
pub(crate) fn source_fingerprint(source: &ResolvedSource) -> u64 {
  if source.is_remote_mirror {
    return file_fingerprint(&source.path);
  }
  source.path.parent().map(directory_fingerprint).unwrap_or(0)
}

/// Reports a failed compilation: full detail in debug mode, a generic notice otherwise.
pub(crate) fn report_compile_failure(kind: AssetKind, handle: &str, file: &Path, err: &CompileError, debug: bool) {
  let label = match kind {
    AssetKind::Style => "SCSS",
    AssetKind::Script => "JS",
  };

  if debug {
    error!(
      handle = %handle,
      file = %file.display(),
      location = %err.location(),
      "{label} file ({}) could not be compiled: {}",
      file.display(),
      err.message
    );
  } else {
    warn!("One or more {label} files could not be compiled. Enable debug mode to see the error details.");
  }
}
