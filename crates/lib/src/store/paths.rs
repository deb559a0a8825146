use std::path::PathBuf;

use crate::config::Config;
use crate::hooks::{HookContext, Hooks};

/// Location of the storage folder on disk and its public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
  pub dir: PathBuf,
  /// Public URL of `dir`, without a trailing slash.
  pub url: String,
}

impl StoragePaths {
  /// Resolves the storage folder from `config`, then lets the
  /// `storage_folder_name`, `storage_folder` and `storage_url` hooks
  /// replace the defaults.
  pub fn resolve(config: &Config, hooks: &Hooks) -> Self {
    let ctx = HookContext::default();

    let name = hooks
      .storage_folder_name
      .apply(config.storage_folder_name.clone(), &ctx);
    let dir = hooks.storage_folder.apply(config.uploads_dir.join(&name), &ctx);

    let default_url = format!("{}/{}", config.uploads_url.trim_end_matches('/'), name);
    let url = hooks.storage_url.apply(default_url, &ctx);

    Self {
      dir,
      url: url.trim_end_matches('/').to_string(),
    }
  }

  /// Public URL of the artifact `name`.
  pub fn url_for(&self, name: &str) -> String {
    format!("{}/{}", self.url, name)
  }
}
