use anyhow::{Context, Result};
use clap::Args;

use assetpipe_lib::config::Config;
use assetpipe_lib::host::MemoryHost;
use assetpipe_lib::pipeline::Styles;
use assetpipe_lib::types::{AssetKind, StyleRequest};

use super::{parse_vars, report};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct StyleArgs {
  /// Registration handle
  pub handle: String,

  /// Local path or http(s) URL of the stylesheet
  pub source: String,

  /// Handles this style depends on
  #[arg(short, long = "dep")]
  pub deps: Vec<String>,

  /// SCSS variable as KEY=VALUE (JSON values keep their type)
  #[arg(long = "var", value_name = "KEY=VALUE")]
  pub vars: Vec<String>,

  /// Register without enqueueing
  #[arg(long)]
  pub no_enqueue: bool,
}

pub fn cmd_style(args: StyleArgs, config: Config, output: OutputFormat) -> Result<()> {
  let variables = parse_vars(&args.vars)?;
  let request = StyleRequest::new(&args.handle, &args.source)
    .with_dependencies(args.deps)
    .with_variables(variables)
    .with_enqueue(!args.no_enqueue);

  let styles = Styles::new(config);
  let mut host = MemoryHost::new();
  let outcome = styles
    .add(&mut host, &request)
    .with_context(|| format!("Failed to register style '{}'", args.handle))?;

  report(AssetKind::Style, &args.handle, &outcome, &host, output)
}
