use std::fs;

use tracing::{debug, info, warn};

use super::{Artifact, Outcome, PipelineError, report_compile_failure, source_fingerprint};
use crate::compile::{GrassEngine, SourceMapOptions, StyleCompiler, StyleEngine, StyleOptions};
use crate::config::Config;
use crate::fingerprint::variables_fingerprint;
use crate::hooks::{HookContext, Hooks};
use crate::host::{Host, StyleRegistration};
use crate::naming::ArtifactName;
use crate::resolve::{Fetcher, HttpFetcher, Resolver};
use crate::store::{CacheStore, StoragePaths};
use crate::types::{AssetKind, StyleRequest, Variables};

/// `sourceRoot` recorded in generated source maps.
const SOURCE_MAP_ROOT: &str = "/";

/// The style pipeline.
///
/// Construct one per process and share it; compilations through the same
/// instance are serialized on its engine.
#[derive(Debug)]
pub struct Styles {
  config: Config,
  hooks: Hooks,
  resolver: Resolver,
  compiler: StyleCompiler,
}

impl Styles {
  /// Pipeline using the `grass` compiler and HTTP fetching.
  pub fn new(config: Config) -> Self {
    Self::with_engine(config, Box::new(GrassEngine), Box::new(HttpFetcher::new()))
  }

  pub fn with_engine(config: Config, engine: Box<dyn StyleEngine>, fetcher: Box<dyn Fetcher>) -> Self {
    Self {
      config,
      hooks: Hooks::new(),
      resolver: Resolver::new(fetcher),
      compiler: StyleCompiler::new(engine),
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn hooks(&self) -> &Hooks {
    &self.hooks
  }

  pub fn hooks_mut(&mut self) -> &mut Hooks {
    &mut self.hooks
  }

  /// Current storage folder and URL, after hooks.
  pub fn storage(&self) -> StoragePaths {
    StoragePaths::resolve(&self.config, &self.hooks)
  }

  /// Compiles the requested style if needed and registers it with `host`.
  ///
  /// Returns [`Outcome::Unavailable`] without registering anything when
  /// compilation fails.
  pub fn add(&self, host: &mut dyn Host, request: &StyleRequest) -> Result<Outcome, PipelineError> {
    let Some(artifact) = self.build(
      &request.handle,
      &request.source,
      &request.dependencies,
      &request.variables,
    )?
    else {
      return Ok(Outcome::Unavailable);
    };

    host.register_style(StyleRegistration {
      handle: request.handle.clone(),
      url: artifact.url.clone(),
      dependencies: request.dependencies.clone(),
    });

    if request.enqueue {
      host.enqueue_style(&request.handle);
    }

    Ok(Outcome::Registered(artifact))
  }

  /// Compiles the style if needed and returns its public URL without
  /// registering it. `None` means compilation failed.
  pub fn compile_and_get_url(
    &self,
    handle: &str,
    source: &str,
    dependencies: &[String],
    variables: &Variables,
  ) -> Result<Option<String>, PipelineError> {
    Ok(self.build(handle, source, dependencies, variables)?.map(|artifact| artifact.url))
  }

  fn build(
    &self,
    handle: &str,
    source: &str,
    dependencies: &[String],
    variables: &Variables,
  ) -> Result<Option<Artifact>, PipelineError> {
    let storage = self.storage();
    let store = CacheStore::new(&storage.dir);
    store.ensure_dir()?;

    let resolved = self.resolver.resolve(source, AssetKind::Style, &store)?;
    let ctx = HookContext::new(handle, &resolved.path, dependencies);
    let variables = self.hooks.extra_variables.apply(variables.clone(), &ctx);

    let vars_fingerprint = variables_fingerprint(&variables);
    let dir_fingerprint = source_fingerprint(&resolved);
    let name = ArtifactName::new(
      handle,
      &resolved.file_name(),
      &[u64::from(vars_fingerprint), dir_fingerprint],
      AssetKind::Style,
    );
    let file_name = name.to_string();

    if store.exists(&file_name) {
      debug!(handle = %handle, artifact = %file_name, "cache hit");
      return Ok(Some(Artifact {
        path: store.path_of(&file_name),
        url: storage.url_for(&file_name),
        name: file_name,
        cache_hit: true,
      }));
    }

    let output_style = self.hooks.output_style.apply(self.config.output_style, &ctx);
    let source_map = self
      .hooks
      .source_map
      .apply(self.config.source_map, &ctx)
      .then(|| SourceMapOptions {
        map_url: storage.url_for(&name.map_name()),
        source_root: SOURCE_MAP_ROOT.to_string(),
      });
    let options = StyleOptions {
      output_style,
      source_map,
    };

    let compiled = match self
      .compiler
      .compile(&resolved.path, handle, &variables, &self.hooks, &options)
    {
      Ok(compiled) => compiled,
      Err(e) => {
        report_compile_failure(AssetKind::Style, handle, &resolved.path, &e, self.config.debug);
        return Ok(None);
      }
    };

    if let Err(e) = store.prune_matching(name.prefix(), AssetKind::Style.extension(), &name.stem()) {
      warn!(handle = %handle, error = %e, "failed to prune stale styles");
    }

    let map_path = match &compiled.source_map {
      Some(map) => Some(store.write(&name.map_name(), map.as_bytes())?),
      None => None,
    };
    let path = match store.write(&file_name, compiled.css.as_bytes()) {
      Ok(path) => path,
      Err(e) => {
        // A map without its stylesheet is never served.
        if let Some(map_path) = map_path
          && let Err(remove_err) = fs::remove_file(&map_path)
        {
          warn!(path = ?map_path, error = %remove_err, "failed to remove orphaned source map");
        }
        return Err(e.into());
      }
    };

    info!(handle = %handle, artifact = %file_name, "compiled style");

    Ok(Some(Artifact {
      path,
      url: storage.url_for(&file_name),
      name: file_name,
      cache_hit: false,
    }))
  }
}
