use anyhow::{Context, Result};
use clap::Args;

use assetpipe_lib::config::Config;
use assetpipe_lib::host::MemoryHost;
use assetpipe_lib::pipeline::Scripts;
use assetpipe_lib::types::{AssetKind, ScriptRequest};

use super::{parse_vars, report};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ScriptArgs {
  /// Registration handle
  pub handle: String,

  /// Local path or http(s) URL of the script
  pub source: String,

  /// Handles this script depends on (default: jquery)
  #[arg(short, long = "dep")]
  pub deps: Vec<String>,

  /// Do not depend on anything, not even jquery
  #[arg(long, conflicts_with = "deps")]
  pub no_deps: bool,

  /// Localized variable as KEY=VALUE (JSON values keep their type)
  #[arg(long = "var", value_name = "KEY=VALUE")]
  pub vars: Vec<String>,

  /// Register without enqueueing
  #[arg(long)]
  pub no_enqueue: bool,

  /// Place the script in the document head instead of the footer
  #[arg(long)]
  pub header: bool,
}

pub fn cmd_script(args: ScriptArgs, config: Config, output: OutputFormat) -> Result<()> {
  let variables = parse_vars(&args.vars)?;
  let mut request = ScriptRequest::new(&args.handle, &args.source)
    .with_variables(variables)
    .with_enqueue(!args.no_enqueue)
    .in_footer(!args.header);
  if args.no_deps {
    request = request.with_dependencies(Vec::<String>::new());
  } else if !args.deps.is_empty() {
    request = request.with_dependencies(args.deps);
  }

  let scripts = Scripts::new(config);
  let mut host = MemoryHost::new();
  let outcome = scripts
    .add(&mut host, &request)
    .with_context(|| format!("Failed to register script '{}'", args.handle))?;

  report(AssetKind::Script, &args.handle, &outcome, &host, output)
}
