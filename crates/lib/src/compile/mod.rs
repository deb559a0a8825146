//! Compiler adapters.
//!
//! The actual SCSS compiler and JS minifier sit behind the [`StyleEngine`]
//! and [`ScriptEngine`] traits. The adapters around them prepare the input
//! (variables preamble for SCSS), serialize access to the engine, link
//! source maps and run the `after_compilation` hook.

mod engine;
mod script;
mod style;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use engine::{GrassEngine, MinifierEngine, ScriptEngine, SourceMapOptions, StyleEngine, StyleInput, StyleOutput};
pub use script::ScriptCompiler;
pub use style::{CompiledStyle, StyleCompiler, StyleOptions, render_preamble, sanitize_value};

/// Formatting of compiled CSS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
  Expanded,
  #[default]
  Compressed,
}

/// The engine rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
  pub message: String,
  /// File the error points at; the compiled source unless the engine named an import.
  pub source_file: PathBuf,
  pub source_line: Option<u32>,
}

impl CompileError {
  pub fn new(message: impl Into<String>, source_file: impl Into<PathBuf>) -> Self {
    Self {
      message: message.into(),
      source_file: source_file.into(),
      source_line: None,
    }
  }

  pub fn with_line(mut self, line: u32) -> Self {
    self.source_line = Some(line);
    self
  }

  /// `file` or `file Line:N`.
  pub fn location(&self) -> String {
    match self.source_line {
      Some(line) => format!("{} Line:{}", self.source_file.display(), line),
      None => self.source_file.display().to_string(),
    }
  }

  pub(crate) fn read_failed(path: &Path, error: &std::io::Error) -> Self {
    Self::new(format!("failed to read source: {error}"), path)
  }
}
