mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use assetpipe_lib::compile::OutputStyle;
use assetpipe_lib::config::Config;

use crate::cmd::{ScriptArgs, StyleArgs, cmd_info, cmd_script, cmd_style};
use crate::output::{OutputFormat, print_error};

/// assetpipe - cached SCSS compilation and JS minification
#[derive(Parser)]
#[command(name = "assetpipe")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(flatten)]
  config: ConfigArgs,

  #[command(subcommand)]
  command: Commands,
}

/// Overrides applied on top of `Config::from_env`.
#[derive(Args)]
struct ConfigArgs {
  /// Directory under which the storage folder is created
  #[arg(long, global = true)]
  uploads_dir: Option<PathBuf>,

  /// Public URL of the uploads directory
  #[arg(long, global = true)]
  uploads_url: Option<String>,

  /// Report full compile-failure details
  #[arg(long, global = true)]
  debug: bool,

  /// Do not link or write source maps
  #[arg(long, global = true)]
  no_source_map: bool,

  /// Emit expanded instead of compressed CSS
  #[arg(long, global = true)]
  expanded: bool,
}

impl ConfigArgs {
  fn into_config(self) -> Config {
    let mut config = Config::from_env();
    if let Some(dir) = self.uploads_dir {
      config.uploads_dir = dir;
    }
    if let Some(url) = self.uploads_url {
      config.uploads_url = url;
    }
    if self.debug {
      config.debug = true;
    }
    if self.no_source_map {
      config.source_map = false;
    }
    if self.expanded {
      config.output_style = OutputStyle::Expanded;
    }
    config
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Compile a stylesheet and register it
  Style(StyleArgs),

  /// Minify a script and register it
  Script(ScriptArgs),

  /// Show the effective configuration and storage location
  Info,
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "info" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(e) = run(cli) {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  let output = cli.output;
  let config = cli.config.into_config();
  debug!(?config, "effective configuration");

  match cli.command {
    Commands::Style(args) => cmd_style(args, config, output),
    Commands::Script(args) => cmd_script(args, config, output),
    Commands::Info => cmd_info(&config, output),
  }
}
