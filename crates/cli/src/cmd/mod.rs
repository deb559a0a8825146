mod info;
mod script;
mod style;

pub use info::cmd_info;
pub use script::{ScriptArgs, cmd_script};
pub use style::{StyleArgs, cmd_style};

use std::fs;

use anyhow::{Result, bail};
use serde::Serialize;
use serde_json::Value;

use assetpipe_lib::host::MemoryHost;
use assetpipe_lib::pipeline::Outcome;
use assetpipe_lib::types::{AssetKind, Variables};

use crate::output::{OutputFormat, format_bytes, print_json, print_stat, print_success, print_warning};

/// Parses repeated `KEY=VALUE` arguments.
///
/// Values that parse as JSON keep their type (`10`, `true`, `{"a":1}`);
/// anything else is taken as a plain string.
pub(crate) fn parse_vars(pairs: &[String]) -> Result<Variables> {
  let mut vars = Variables::new();
  for pair in pairs {
    let Some((key, value)) = pair.split_once('=') else {
      bail!("invalid variable '{}': expected KEY=VALUE", pair);
    };
    let key = key.trim();
    if key.is_empty() {
      bail!("invalid variable '{}': empty key", pair);
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    vars.insert(key.to_string(), value);
  }
  Ok(vars)
}

#[derive(Serialize)]
struct Report<'a> {
  kind: AssetKind,
  handle: &'a str,
  #[serde(flatten)]
  outcome: &'a Outcome,
  host: &'a MemoryHost,
}

/// Prints what the host received and fails when nothing was registered.
pub(crate) fn report(
  kind: AssetKind,
  handle: &str,
  outcome: &Outcome,
  host: &MemoryHost,
  output: OutputFormat,
) -> Result<()> {
  if output.is_json() {
    print_json(&Report {
      kind,
      handle,
      outcome,
      host,
    })?;
  } else {
    match outcome {
      Outcome::Registered(artifact) => {
        print_success(&format!("Registered {} '{}'", kind, handle));
        print_stat("URL", &artifact.url);
        print_stat("Artifact", &artifact.path.display().to_string());
        print_stat("Cache", if artifact.cache_hit { "hit" } else { "miss" });
        if let Ok(meta) = fs::metadata(&artifact.path) {
          print_stat("Size", &format_bytes(meta.len()));
        }
        for localization in &host.localizations {
          print_stat("Localized", &localization.object_name);
        }
      }
      Outcome::Unavailable => print_warning(&format!("{} '{}' was not registered", kind, handle)),
    }
  }

  if !outcome.is_registered() {
    bail!("{} '{}' could not be compiled", kind, handle);
  }
  Ok(())
}
