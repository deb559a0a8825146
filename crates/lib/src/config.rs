//! Pipeline configuration.
//!
//! Defaults can be overridden through environment variables:
//! - `ASSETPIPE_UPLOADS_DIR`: base directory holding the storage folder
//! - `ASSETPIPE_UPLOADS_URL`: public URL of that directory
//! - `ASSETPIPE_DEBUG`: verbose compile-failure diagnostics

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::compile::OutputStyle;
use crate::consts::{DEFAULT_STORAGE_FOLDER_NAME, DEFAULT_UPLOADS_URL, ENV_DEBUG, ENV_UPLOADS_DIR, ENV_UPLOADS_URL};
use crate::platform::paths::cache_dir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// Directory under which the storage folder is created.
  pub uploads_dir: PathBuf,
  /// Public URL that serves `uploads_dir`.
  pub uploads_url: String,
  /// Name of the storage folder inside `uploads_dir`.
  pub storage_folder_name: String,
  /// Print full diagnostics when a compilation fails.
  pub debug: bool,
  /// Link source maps into compiled styles when the engine produces one.
  ///
  /// The default [`GrassEngine`](crate::compile::GrassEngine) never produces
  /// a map, so this only takes effect with an engine that does.
  pub source_map: bool,
  pub output_style: OutputStyle,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      uploads_dir: cache_dir(),
      uploads_url: DEFAULT_UPLOADS_URL.to_string(),
      storage_folder_name: DEFAULT_STORAGE_FOLDER_NAME.to_string(),
      debug: false,
      source_map: true,
      output_style: OutputStyle::Compressed,
    }
  }
}

impl Config {
  /// Default configuration with environment overrides applied.
  pub fn from_env() -> Self {
    let mut config = Self::default();

    if let Ok(dir) = std::env::var(ENV_UPLOADS_DIR) {
      config.uploads_dir = PathBuf::from(dir);
    }

    if let Ok(url) = std::env::var(ENV_UPLOADS_URL) {
      config.uploads_url = url;
    }

    if let Ok(flag) = std::env::var(ENV_DEBUG) {
      config.debug = parse_flag(&flag);
    }

    config
  }

  /// Configuration rooted at an explicit uploads directory and URL.
  pub fn with_uploads(dir: impl Into<PathBuf>, url: impl Into<String>) -> Self {
    Self {
      uploads_dir: dir.into(),
      uploads_url: url.into(),
      ..Self::default()
    }
  }
}

fn parse_flag(value: &str) -> bool {
  matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
