//! Request and source types shared by both pipelines.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SCRIPT_DEPENDENCY;

/// Caller-supplied variables.
///
/// Values may be strings, numbers, booleans, null, arrays or nested maps.
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// The two kinds of asset the pipelines handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
  Style,
  Script,
}

impl AssetKind {
  /// Output extension, without the leading dot.
  pub fn extension(self) -> &'static str {
    match self {
      AssetKind::Style => "css",
      AssetKind::Script => "js",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      AssetKind::Style => "style",
      AssetKind::Script => "script",
    }
  }
}

impl std::fmt::Display for AssetKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A source reference resolved to an existing local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
  /// Canonical, symlink-resolved path of the file to compile.
  pub path: PathBuf,
  /// Whether `path` is a local mirror of a remote URL.
  pub is_remote_mirror: bool,
}

impl ResolvedSource {
  /// File name component of the resolved path.
  pub fn file_name(&self) -> String {
    self
      .path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default()
  }
}

/// A style registration request.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRequest {
  pub handle: String,
  pub source: String,
  pub dependencies: Vec<String>,
  pub variables: Variables,
  pub enqueue: bool,
}

impl StyleRequest {
  pub fn new(handle: impl Into<String>, source: impl Into<String>) -> Self {
    Self {
      handle: handle.into(),
      source: source.into(),
      dependencies: Vec::new(),
      variables: Variables::new(),
      enqueue: true,
    }
  }

  pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dependencies = dependencies.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_variables(mut self, variables: Variables) -> Self {
    self.variables = variables;
    self
  }

  pub fn with_enqueue(mut self, enqueue: bool) -> Self {
    self.enqueue = enqueue;
    self
  }
}

/// A script registration request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRequest {
  pub handle: String,
  pub source: String,
  pub dependencies: Vec<String>,
  /// Payload localized to the host as `<handle>_vars`; not part of the compiled output.
  pub variables: Variables,
  pub enqueue: bool,
  pub in_footer: bool,
}

impl ScriptRequest {
  pub fn new(handle: impl Into<String>, source: impl Into<String>) -> Self {
    Self {
      handle: handle.into(),
      source: source.into(),
      dependencies: vec![DEFAULT_SCRIPT_DEPENDENCY.to_string()],
      variables: Variables::new(),
      enqueue: true,
      in_footer: true,
    }
  }

  pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dependencies = dependencies.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_variables(mut self, variables: Variables) -> Self {
    self.variables = variables;
    self
  }

  pub fn with_enqueue(mut self, enqueue: bool) -> Self {
    self.enqueue = enqueue;
    self
  }

  pub fn in_footer(mut self, in_footer: bool) -> Self {
    self.in_footer = in_footer;
    self
  }
}
