//! Named extension points.
//!
//! Each hook is an ordered chain of transformers. A transformer receives the
//! current value plus the [`HookContext`] of the call and returns the
//! replacement value; transformers run in registration order and an empty
//! chain returns the value unchanged.

use std::fmt;
use std::path::PathBuf;

use crate::compile::OutputStyle;
use crate::types::Variables;

/// Contextual arguments passed to every transformer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookContext {
  pub handle: String,
  pub file: PathBuf,
  pub dependencies: Vec<String>,
}

impl HookContext {
  pub fn new(handle: impl Into<String>, file: impl Into<PathBuf>, dependencies: &[String]) -> Self {
    Self {
      handle: handle.into(),
      file: file.into(),
      dependencies: dependencies.to_vec(),
    }
  }
}

type Transformer<T> = Box<dyn Fn(T, &HookContext) -> T + Send + Sync>;

/// An ordered chain of transformers for one hook.
pub struct Filter<T> {
  transformers: Vec<Transformer<T>>,
}

impl<T> Filter<T> {
  pub fn new() -> Self {
    Self {
      transformers: Vec::new(),
    }
  }

  /// Appends a transformer to the chain.
  pub fn add<F>(&mut self, transformer: F) -> &mut Self
  where
    F: Fn(T, &HookContext) -> T + Send + Sync + 'static,
  {
    self.transformers.push(Box::new(transformer));
    self
  }

  /// Runs `value` through every transformer in registration order.
  pub fn apply(&self, value: T, ctx: &HookContext) -> T {
    self.transformers.iter().fold(value, |value, transformer| transformer(value, ctx))
  }

  pub fn len(&self) -> usize {
    self.transformers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.transformers.is_empty()
  }
}

impl<T> Default for Filter<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for Filter<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Filter").field("transformers", &self.transformers.len()).finish()
  }
}

/// The hook table owned by one pipeline.
#[derive(Debug, Default)]
pub struct Hooks {
  /// Full path of the storage folder.
  pub storage_folder: Filter<PathBuf>,
  /// Name of the storage folder inside the uploads directory.
  pub storage_folder_name: Filter<String>,
  /// Public URL of the storage folder.
  pub storage_url: Filter<String>,
  /// Variables injected before compilation (styles) or localized (scripts).
  pub extra_variables: Filter<Variables>,
  /// Style source placed before the `@import` of the original file.
  pub before_content: Filter<String>,
  /// Style source placed after the `@import` of the original file.
  pub after_content: Filter<String>,
  /// Compiled output before it is written to the store.
  pub after_compilation: Filter<String>,
  pub output_style: Filter<OutputStyle>,
  pub source_map: Filter<bool>,
}

impl Hooks {
  pub fn new() -> Self {
    Self::default()
  }
}
