//! Source resolution.
//!
//! Turns a caller-supplied reference into an existing local file:
//! - Absolute `http`/`https` URLs are mirrored into the store on first use
//!   and the mirror is reused afterwards, even if the remote changes
//! - Anything else is a local path that must exist
//!
//! Both cases return the canonical, symlink-resolved path.

mod fetch;

use std::path::{Path, PathBuf};

use reqwest::Url;
use thiserror::Error;
use tracing::debug;

pub use fetch::{Fetcher, HttpFetcher};

use crate::naming::mirror_file_name;
use crate::store::{CacheStore, StoreError};
use crate::types::{AssetKind, ResolvedSource};

/// Errors that can occur while resolving a source reference.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// The reference is neither a URL nor an existing file.
  #[error("{} does not exist", .0.display())]
  NotFound(PathBuf),

  /// Downloading a remote source failed.
  #[error("fetch failed for {url}: {message}")]
  Fetch { url: String, message: String },

  /// Writing the mirror failed.
  #[error(transparent)]
  Store(#[from] StoreError),

  /// Failed to canonicalize the path.
  #[error("failed to resolve path '{path}': {source}")]
  Canonicalize {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Resolves source references, mirroring remote ones into the store.
pub struct Resolver {
  fetcher: Box<dyn Fetcher>,
}

impl Resolver {
  pub fn new(fetcher: Box<dyn Fetcher>) -> Self {
    Self { fetcher }
  }

  /// Resolves `source` to an existing local file.
  ///
  /// Remote mirrors are written to `store` as `cached-<sanitized-url>.<ext>`;
  /// an existing mirror is returned without touching the network.
  pub fn resolve(&self, source: &str, kind: AssetKind, store: &CacheStore) -> Result<ResolvedSource, ResolveError> {
    if remote_url(source).is_some() {
      let path = self.mirror(source, kind, store)?;
      return Ok(ResolvedSource {
        path: canonicalize(&path)?,
        is_remote_mirror: true,
      });
    }

    let path = Path::new(source);
    if !path.is_file() {
      return Err(ResolveError::NotFound(path.to_path_buf()));
    }

    Ok(ResolvedSource {
      path: canonicalize(path)?,
      is_remote_mirror: false,
    })
  }

  fn mirror(&self, url: &str, kind: AssetKind, store: &CacheStore) -> Result<PathBuf, ResolveError> {
    let name = mirror_file_name(url, kind);

    if store.exists(&name) {
      debug!(url = %url, mirror = %name, "using existing mirror");
      return Ok(store.path_of(&name));
    }

    let bytes = self.fetcher.fetch(url)?;
    Ok(store.write(&name, &bytes)?)
  }
}

impl std::fmt::Debug for Resolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Resolver").finish_non_exhaustive()
  }
}

/// Parses `source` as an absolute `http`/`https` URL with a host.
pub fn remote_url(source: &str) -> Option<Url> {
  let url = Url::parse(source).ok()?;
  let is_http = matches!(url.scheme(), "http" | "https");
  (is_http && url.has_host()).then_some(url)
}

fn canonicalize(path: &Path) -> Result<PathBuf, ResolveError> {
  dunce::canonicalize(path).map_err(|source| ResolveError::Canonicalize {
    path: path.to_path_buf(),
    source,
  })
}
