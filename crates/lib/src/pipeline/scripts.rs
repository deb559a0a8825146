use tracing::{debug, info, warn};

use super::{Artifact, Outcome, PipelineError, report_compile_failure, source_fingerprint};
use crate::compile::{MinifierEngine, ScriptCompiler, ScriptEngine};
use crate::config::Config;
use crate::hooks::{HookContext, Hooks};
use crate::host::{Host, ScriptRegistration, localized_object_name};
use crate::naming::ArtifactName;
use crate::resolve::{Fetcher, HttpFetcher, Resolver};
use crate::store::{CacheStore, StoragePaths};
use crate::types::{AssetKind, ScriptRequest};

/// The script pipeline.
///
/// Minified scripts are named by the source directory fingerprint only;
/// variables are handed to the host at registration time instead of being
/// compiled in.
#[derive(Debug)]
pub struct Scripts {
  config: Config,
  hooks: Hooks,
  resolver: Resolver,
  compiler: ScriptCompiler,
}

impl Scripts {
  /// Pipeline using the `minifier` crate and HTTP fetching.
  pub fn new(config: Config) -> Self {
    Self::with_engine(config, Box::new(MinifierEngine), Box::new(HttpFetcher::new()))
  }

  pub fn with_engine(config: Config, engine: Box<dyn ScriptEngine>, fetcher: Box<dyn Fetcher>) -> Self {
    Self {
      config,
      hooks: Hooks::new(),
      resolver: Resolver::new(fetcher),
      compiler: ScriptCompiler::new(engine),
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

  pub fn storage(&self) -> StoragePaths {
    StoragePaths::resolve(&self.config, &self.hooks)
  }

  /// Minifies the requested script if needed, registers it with `host` and
  /// localizes its variables.
  pub fn add(&self, host: &mut dyn Host, request: &ScriptRequest) -> Result<Outcome, PipelineError> {
    let Some(artifact) = self.build(&request.handle, &request.source)? else {
      return Ok(Outcome::Unavailable);
    };

    host.register_script(ScriptRegistration {
      handle: request.handle.clone(),
      url: artifact.url.clone(),
      dependencies: request.dependencies.clone(),
      in_footer: request.in_footer,
    });

    let ctx = HookContext::new(&request.handle, &artifact.path, &request.dependencies);
    let payload = self.hooks.extra_variables.apply(request.variables.clone(), &ctx);
    if !payload.is_empty() {
      host.localize_script(&request.handle, &localized_object_name(&request.handle), &payload);
    }

    if request.enqueue {
      host.enqueue_script(&request.handle);
    }

    Ok(Outcome::Registered(artifact))
  }

  /// Minifies the script if needed and returns its public URL without
  /// registering it. `None` means minification failed.
  pub fn compile_and_get_url(&self, handle: &str, source: &str) -> Result<Option<String>, PipelineError> {
    Ok(self.build(handle, source)?.map(|artifact| artifact.url))
  }

  fn build(&self, handle: &str, source: &str) -> Result<Option<Artifact>, PipelineError> {
    let storage = self.storage();
    let store = CacheStore::new(&storage.dir);
    store.ensure_dir()?;

    let resolved = self.resolver.resolve(source, AssetKind::Script, &store)?;
    let name = ArtifactName::new(
      handle,
      &resolved.file_name(),
      &[source_fingerprint(&resolved)],
      AssetKind::Script,
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

    let minified = match self.compiler.compile(&resolved.path, handle, &self.hooks) {
      Ok(minified) => minified,
      Err(e) => {
        report_compile_failure(AssetKind::Script, handle, &resolved.path, &e, self.config.debug);
        return Ok(None);
      }
    };

    if let Err(e) = store.prune_matching(name.prefix(), AssetKind::Script.extension(), &name.stem()) {
      warn!(handle = %handle, error = %e, "failed to prune stale scripts");
    }

    let path = store.write(&file_name, minified.as_bytes())?;
    info!(handle = %handle, artifact = %file_name, "minified script");

    Ok(Some(Artifact {
      path,
      url: storage.url_for(&file_name),
      name: file_name,
      cache_hit: false,
    }))
  }
}
