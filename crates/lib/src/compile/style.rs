//! SCSS compilation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use super::{CompileError, OutputStyle, SourceMapOptions, StyleEngine, StyleInput};
use crate::consts::SCSS_EXTENSION;
use crate::hooks::{HookContext, Hooks};
use crate::types::Variables;

/// Units that mark a string value as a CSS dimension rather than text.
const DIMENSION_SUFFIXES: [&str; 6] = ["px", "em", "%", "vh", "vw", "rem"];

/// Rendered for `false`, `null` and empty top-level values so that the
/// stylesheet's own `!default` can still set them.
const OVERRIDABLE_FALSE: &str = "false !default";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleOptions {
  pub output_style: OutputStyle,
  pub source_map: Option<SourceMapOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStyle {
  pub css: String,
  /// Map to store next to the CSS; only set when source maps are enabled and
  /// the engine produced one.
  pub source_map: Option<String>,
}

/// Adapter around a [`StyleEngine`].
///
/// The engine is used by one compilation at a time.
pub struct StyleCompiler {
  engine: Mutex<Box<dyn StyleEngine>>,
}

impl StyleCompiler {
  pub fn new(engine: Box<dyn StyleEngine>) -> Self {
    Self {
      engine: Mutex::new(engine),
    }
  }

  /// Compiles the style at `path`.
  ///
  /// SCSS sources get a preamble declaring `variables` and then import the
  /// original file by its absolute path, so `@import`s inside it resolve
  /// from the file's directory whatever the working directory is. Other sources (plain CSS) go to the engine unmodified.
  pub fn compile(
    &self,
    path: &Path,
    handle: &str,
    variables: &Variables,
    hooks: &Hooks,
    options: &StyleOptions,
  ) -> Result<CompiledStyle, CompileError> {
    let ctx = HookContext::new(handle, path, &[]);
    let source = prepare_source(path, variables, hooks, &ctx)?;

    let load_paths: Vec<PathBuf> = path.parent().map(Path::to_path_buf).into_iter().collect();
    let input = StyleInput {
      source: &source,
      file: path,
      load_paths: &load_paths,
      output_style: options.output_style,
      source_map: options.source_map.as_ref(),
    };

    let output = {
      let mut engine = self.engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
      engine.compile(&input)?
    };

    let mut css = output.css;
    let source_map = match (&options.source_map, output.source_map) {
      (Some(map_options), Some(map)) => {
        css.push_str(&format!("\n/*# sourceMappingURL={} */", map_options.map_url));
        Some(map)
      }
      _ => None,
    };

    let css = hooks.after_compilation.apply(css, &ctx);
    debug!(handle = %handle, file = ?path, size = css.len(), "compiled style");

    Ok(CompiledStyle { css, source_map })
  }
}

impl std::fmt::Debug for StyleCompiler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StyleCompiler").finish_non_exhaustive()
  }
}

fn prepare_source(path: &Path, variables: &Variables, hooks: &Hooks, ctx: &HookContext) -> Result<String, CompileError> {
  let is_scss = path.extension().and_then(|ext| ext.to_str()) == Some(SCSS_EXTENSION);
  if !is_scss {
    return fs::read_to_string(path).map_err(|e| CompileError::read_failed(path, &e));
  }

  let target = import_target(path)?;

  let mut content = render_preamble(variables);
  content = hooks.before_content.apply(content, ctx);
  content.push_str(&format!("@import \"{}\";", escape(&target)));
  Ok(hooks.after_content.apply(content, ctx))
}

/// Absolute, forward-slashed path the preamble imports the source by.
///
/// Engines resolve an extension-qualified relative import against the
/// process working directory rather than their load paths, so the source
/// is always named absolutely. Its own relative imports then resolve from
/// its directory.
fn import_target(path: &Path) -> Result<String, CompileError> {
  let canonical = dunce::canonicalize(path).map_err(|e| CompileError::read_failed(path, &e))?;
  Ok(canonical.to_string_lossy().replace('\\', "/"))
}

/// One `$name: value; ` declaration per variable, in key order.
pub fn render_preamble(variables: &Variables) -> String {
  let mut keys: Vec<&String> = variables.keys().collect();
  keys.sort();

  keys
    .into_iter()
    .map(|key| format!("${}: {}; ", key, sanitize_value(&variables[key])))
    .collect()
}

/// Renders a top-level variable value as SCSS.
///
/// - dimensions (`10px`, `1.5em`, `50%`, ...) and `#` colors stay unquoted
/// - other strings are quoted
/// - `false`, `null` and `""` become `false !default`
/// - maps become `(key: value, )` literals, arrays `(a, b)` lists
pub fn sanitize_value(value: &Value) -> String {
  match value {
    Value::Null | Value::Bool(false) => OVERRIDABLE_FALSE.to_string(),
    Value::String(s) if s.is_empty() => OVERRIDABLE_FALSE.to_string(),
    other => render_nested(other),
  }
}

/// Renders a value inside a map or list, where `!default` is not allowed.
fn render_nested(value: &Value) -> String {
  match value {
    Value::Null | Value::Bool(false) => "false".to_string(),
    Value::Bool(true) => "true".to_string(),
    Value::Number(n) => n.to_string(),
    Value::String(s) if is_unquoted_literal(s) => s.clone(),
    Value::String(s) => format!("\"{}\"", escape(s)),
    Value::Object(map) => {
      let mut entries: Vec<(&String, &Value)> = map.iter().collect();
      entries.sort_by(|a, b| a.0.cmp(b.0));

      let body: String = entries
        .into_iter()
        .map(|(key, value)| format!("{}: {}, ", key, render_nested(value)))
        .collect();
      format!("({body})")
    }
    Value::Array(items) => {
      let body: Vec<String> = items.iter().map(render_nested).collect();
      format!("({})", body.join(", "))
    }
  }
}

fn is_unquoted_literal(s: &str) -> bool {
  s.starts_with('#') || DIMENSION_SUFFIXES.iter().any(|suffix| s.ends_with(suffix))
}

fn escape(s: &str) -> String {
  s.replace('\\', "\\\\").replace('"', "\\\"")
}
