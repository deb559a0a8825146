//! JavaScript minification.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tracing::debug;

use super::{CompileError, ScriptEngine};
use crate::hooks::{HookContext, Hooks};

/// Adapter around a [`ScriptEngine`].
pub struct ScriptCompiler {
  engine: Mutex<Box<dyn ScriptEngine>>,
}

impl ScriptCompiler {
  pub fn new(engine: Box<dyn ScriptEngine>) -> Self {
    Self {
      engine: Mutex::new(engine),
    }
  }

  /// Minifies the script at `path` and runs the `after_compilation` hook.
  ///
  /// The file must be valid UTF-8; anything else is reported as a
  /// [`CompileError`] pointing at the line of the first invalid byte.
  pub fn compile(&self, path: &Path, handle: &str, hooks: &Hooks) -> Result<String, CompileError> {
    let bytes = fs::read(path).map_err(|e| CompileError::read_failed(path, &e))?;

    let source = String::from_utf8(bytes).map_err(|e| {
      let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
      let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
      CompileError::new(format!("source is not valid UTF-8: {}", e.utf8_error()), path)
        .with_line(u32::try_from(line).unwrap_or(u32::MAX))
    })?;

    let minified = {
      let mut engine = self.engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
      engine.minify(&source, path)?
    };

    let ctx = HookContext::new(handle, path, &[]);
    let output = hooks.after_compilation.apply(minified, &ctx);
    debug!(handle = %handle, file = ?path, size = output.len(), "minified script");

    Ok(output)
  }
}

impl std::fmt::Debug for ScriptCompiler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ScriptCompiler").finish_non_exhaustive()
  }
}
