//! Engine seams and their default implementations.

use std::path::{Path, PathBuf};

use super::{CompileError, OutputStyle};

/// Source-map settings handed to the style engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMapOptions {
  /// Public URL the compiled CSS links its map from.
  pub map_url: String,
  /// `sourceRoot` recorded in the map.
  pub source_root: String,
}

/// One style compilation.
#[derive(Debug, Clone, Copy)]
pub struct StyleInput<'a> {
  /// Prepared source text.
  pub source: &'a str,
  /// The file the source was prepared from.
  pub file: &'a Path,
  /// Directories searched for `@import`s.
  pub load_paths: &'a [PathBuf],
  pub output_style: OutputStyle,
  /// `None` when source maps are disabled.
  pub source_map: Option<&'a SourceMapOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOutput {
  pub css: String,
  /// Source map JSON, if the engine produced one.
  pub source_map: Option<String>,
}

/// A SCSS-to-CSS compiler.
pub trait StyleEngine: Send {
  fn compile(&mut self, input: &StyleInput<'_>) -> Result<StyleOutput, CompileError>;
}

/// A JavaScript minifier.
pub trait ScriptEngine: Send {
  fn minify(&mut self, source: &str, file: &Path) -> Result<String, CompileError>;
}

/// [`StyleEngine`] backed by the pure-Rust `grass` compiler.
///
/// `grass` does not generate source maps, so `source_map` is always `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrassEngine;

impl StyleEngine for GrassEngine {
  fn compile(&mut self, input: &StyleInput<'_>) -> Result<StyleOutput, CompileError> {
    let style = match input.output_style {
      OutputStyle::Expanded => grass::OutputStyle::Expanded,
      OutputStyle::Compressed => grass::OutputStyle::Compressed,
    };

    let mut options = grass::Options::default().style(style).quiet(true);
    for path in input.load_paths {
      options = options.load_path(path.as_path());
    }

    let css = grass::from_string(input.source.to_owned(), &options)
      .map_err(|e| engine_error(&e.to_string(), input.file))?;

    Ok(StyleOutput { css, source_map: None })
  }
}

/// [`ScriptEngine`] backed by the `minifier` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinifierEngine;

impl ScriptEngine for MinifierEngine {
  fn minify(&mut self, source: &str, _file: &Path) -> Result<String, CompileError> {
    Ok(minifier::js::minify(source).to_string())
  }
}

/// Converts a rendered engine error into a [`CompileError`].
///
/// Sass-style errors end with a trace line such as `  main.scss 3:12  root stylesheet`;
/// the file and line are taken from the first such line when present.
fn engine_error(rendered: &str, file: &Path) -> CompileError {
  let message = rendered
    .lines()
    .next()
    .map(|line| line.trim_start_matches("Error: ").trim())
    .filter(|line| !line.is_empty())
    .unwrap_or("compilation failed")
    .to_string();

  let mut error = CompileError::new(message, file);
  if let Some((trace_file, line)) = rendered.lines().find_map(trace_location) {
    error = error.with_line(line);
    if let Some(trace_file) = trace_file {
      error.source_file = trace_file;
    }
  }
  error
}

/// Extracts `(file, line)` from a `<file> <line>:<col>` trace line.
fn trace_location(line: &str) -> Option<(Option<PathBuf>, u32)> {
  let tokens: Vec<&str> = line.split_whitespace().collect();

  tokens.iter().enumerate().find_map(|(i, token)| {
    let (row, col) = token.split_once(':')?;
    let row: u32 = row.parse().ok()?;
    col.parse::<u32>().ok()?;

    let file = i
      .checked_sub(1)
      .map(|prev| tokens[prev])
      .filter(|prev| prev.contains('.'))
      .map(PathBuf::from);
    Some((file, row))
  })
}
