//! Deterministic artifact and mirror file names.
//!
//! An artifact is named `<handle>-<file>-<fingerprint>...<ext>` where `<file>`
//! is the source file name with dots replaced by hyphens. The fingerprints
//! are the only part of the name that changes between builds of the same
//! handle and source, so `<handle>-<file>-` is the namespace used to find
//! superseded artifacts.

use std::fmt;

use crate::consts::MIRROR_PREFIX;
use crate::types::AssetKind;

/// Name of a compiled artifact inside the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName {
  prefix: String,
  fingerprints: Vec<u64>,
  kind: AssetKind,
}

impl ArtifactName {
  /// Builds the name for `handle` compiled from `source_file_name`.
  ///
  /// `fingerprints` are appended in the order given; styles pass the
  /// variables fingerprint before the directory fingerprint.
  pub fn new(handle: &str, source_file_name: &str, fingerprints: &[u64], kind: AssetKind) -> Self {
    Self {
      prefix: format!("{}-{}-", handle, source_file_name.replace('.', "-")),
      fingerprints: fingerprints.to_vec(),
      kind,
    }
  }

  /// The `<handle>-<file>-` namespace shared by every build of this source.
  pub fn prefix(&self) -> &str {
    &self.prefix
  }

  /// Name without the extension.
  pub fn stem(&self) -> String {
    let fingerprints: Vec<String> = self.fingerprints.iter().map(u64::to_string).collect();
    format!("{}{}", self.prefix, fingerprints.join("-"))
  }

  /// Sibling source map name (`<stem>.map`).
  pub fn map_name(&self) -> String {
    format!("{}.map", self.stem())
  }
}

impl fmt::Display for ArtifactName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.stem(), self.kind.extension())
  }
}

/// Mirror file name for a remote `url`.
///
/// The scheme and `://` are stripped and `?`, `&` and `/` become hyphens, so
/// `https://cdn.example.com/a.css?v=2` maps to `cached-cdn.example.com-a.css-v=2.css`.
pub fn mirror_file_name(url: &str, kind: AssetKind) -> String {
  let stripped = url.replace("https", "").replace("http", "").replace("://", "");
  let sanitized: String = stripped
    .chars()
    .map(|c| match c {
      '?' | '&' | '/' => '-',
      c => c,
    })
    .collect();

  format!("{}{}.{}", MIRROR_PREFIX, sanitized, kind.extension())
}
