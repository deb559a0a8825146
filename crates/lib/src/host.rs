//! The boundary to the host environment.
//!
//! After a successful compilation the pipelines hand the host a public URL,
//! the handle, its dependencies and placement; emitting the actual tags is
//! the host's job.

use serde::Serialize;

use crate::consts::LOCALIZED_VARS_SUFFIX;
use crate::types::Variables;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRegistration {
  pub handle: String,
  pub url: String,
  pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptRegistration {
  pub handle: String,
  pub url: String,
  pub dependencies: Vec<String>,
  pub in_footer: bool,
}

/// Receives registrations from the pipelines.
pub trait Host {
  fn register_style(&mut self, registration: StyleRegistration);

  fn register_script(&mut self, registration: ScriptRegistration);

  fn enqueue_style(&mut self, handle: &str);

  fn enqueue_script(&mut self, handle: &str);

  /// Exposes `payload` to the script `handle` under the global `object_name`.
  fn localize_script(&mut self, handle: &str, object_name: &str, payload: &Variables);
}

/// A localized-variables payload recorded by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Localization {
  pub handle: String,
  pub object_name: String,
  pub payload: Variables,
}

/// [`Host`] that records everything it receives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryHost {
  pub styles: Vec<StyleRegistration>,
  pub scripts: Vec<ScriptRegistration>,
  pub enqueued_styles: Vec<String>,
  pub enqueued_scripts: Vec<String>,
  pub localizations: Vec<Localization>,
}

impl MemoryHost {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn style(&self, handle: &str) -> Option<&StyleRegistration> {
    self.styles.iter().rev().find(|s| s.handle == handle)
  }

  pub fn script(&self, handle: &str) -> Option<&ScriptRegistration> {
    self.scripts.iter().rev().find(|s| s.handle == handle)
  }
}

impl Host for MemoryHost {
  fn register_style(&mut self, registration: StyleRegistration) {
    self.styles.push(registration);
  }

  fn register_script(&mut self, registration: ScriptRegistration) {
    self.scripts.push(registration);
  }

  fn enqueue_style(&mut self, handle: &str) {
    self.enqueued_styles.push(handle.to_string());
  }

  fn enqueue_script(&mut self, handle: &str) {
    self.enqueued_scripts.push(handle.to_string());
  }

  fn localize_script(&mut self, handle: &str, object_name: &str, payload: &Variables) {
    self.localizations.push(Localization {
      handle: handle.to_string(),
      object_name: object_name.to_string(),
      payload: payload.clone(),
    });
  }
}

/// Global object name for a script's localized variables: `my-app` → `my_app_vars`.
pub fn localized_object_name(handle: &str) -> String {
  format!("{}{}", handle.replace('-', "_"), LOCALIZED_VARS_SUFFIX)
}
