use anyhow::Result;
use serde_json::json;

use assetpipe_lib::config::Config;
use assetpipe_lib::hooks::Hooks;
use assetpipe_lib::store::StoragePaths;

use crate::output::{OutputFormat, print_info, print_json, print_stat};

pub fn cmd_info(config: &Config, output: OutputFormat) -> Result<()> {
  let storage = StoragePaths::resolve(config, &Hooks::new());

  if output.is_json() {
    print_json(&json!({
      "config": config,
      "storage": { "dir": storage.dir, "url": storage.url },
    }))?;
    return Ok(());
  }

  print_info(&format!("assetpipe v{}", env!("CARGO_PKG_VERSION")));
  print_stat("Storage", &storage.dir.display().to_string());
  print_stat("URL", &storage.url);
  print_stat("Output style", &format!("{:?}", config.output_style).to_lowercase());
  // The CLI always compiles with grass, which emits no maps.
  print_stat(
    "Source maps",
    if config.source_map { "on (grass produces none)" } else { "off" },
  );
  print_stat("Debug", if config.debug { "on" } else { "off" });
  Ok(())
}
