//! UDF artifact resolution pipeline.
//!
//! This module provides the single entry point turning a script into deployable
//! artifacts. A run proceeds as:
//! 1. Gate the target gateway type
//! 2. Extract function references from the script
//! 3. Resolve each function's source from the registry
//! 4. Classify functions into JVM and interpreted groups
//! 5. Package both groups concurrently
//! 6. Compose the artifact paths
//!
//! Any failure aborts the run; partial results are never returned.

mod types;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::ResolveConfig;
use crate::gateway::{GatewayType, check_gateway};
use crate::package::{ArchivePackager, ArtifactStore, CompilerSet, ScriptPackager};
use crate::udf::classify::{Classified, classify};
use crate::udf::extract::extract_functions;
use crate::udf::registry::SourceRegistry;
use crate::udf::resolve::resolve_sources;

pub use types::{ArtifactResult, ResolveError};

/// Resolves UDF references in scripts into packaged artifacts.
#[derive(Clone)]
pub struct UdfResolver {
  registry: Arc<dyn SourceRegistry>,
  archive: Arc<ArchivePackager>,
  script: Arc<ScriptPackager>,
}

impl UdfResolver {
  pub fn new(registry: Arc<dyn SourceRegistry>, compilers: CompilerSet, store: ArtifactStore) -> Self {
    Self {
      registry,
      archive: Arc::new(ArchivePackager::new(compilers, store.clone())),
      script: Arc::new(ScriptPackager::new(store)),
    }
  }

  /// Resolver using the built-in compilers and artifact path from `config`.
  pub fn from_config(registry: Arc<dyn SourceRegistry>, config: &ResolveConfig) -> Self {
    Self::new(
      registry,
      CompilerSet::from_config(config),
      ArtifactStore::from_config(config),
    )
  }

  /// Resolve and package every function referenced by `script`.
  pub async fn resolve_artifacts(&self, script: &str, gateway: GatewayType) -> Result<ArtifactResult, ResolveError> {
    info!(gateway = %gateway, "initializing UDFs: start");

    check_gateway(gateway)?;

    let descriptors = extract_functions(script);
    debug!(functions = descriptors.len(), "extracted function references");

    let resolved = resolve_sources(self.registry.as_ref(), descriptors)?;
    let Classified { jvm, interpreted } = classify(resolved);
    debug!(jvm = jvm.len(), interpreted = interpreted.len(), "classified functions");

    let archive = Arc::clone(&self.archive);
    let script_packager = Arc::clone(&self.script);
    let archive_task = tokio::task::spawn_blocking(move || archive.package(&jvm));
    let script_task = tokio::task::spawn_blocking(move || script_packager.package(&interpreted));

    let (archive_paths, script_paths) = tokio::try_join!(join_packager(archive_task), join_packager(script_task))?;
    let result = ArtifactResult::new(archive_paths, script_paths);

    info!(
      archives = result.archive_paths().len(),
      scripts = result.script_paths().len(),
      "initializing UDFs: finish"
    );
    Ok(result)
  }

  /// Blocking variant of [`resolve_artifacts`](Self::resolve_artifacts) for
  /// callers without a runtime.
  ///
  /// Returns [`ResolveError::NestedRuntime`] when called from inside a tokio
  /// runtime; async callers use `resolve_artifacts` directly.
  pub fn resolve_artifacts_blocking(&self, script: &str, gateway: GatewayType) -> Result<ArtifactResult, ResolveError> {
    if tokio::runtime::Handle::try_current().is_ok() {
      return Err(ResolveError::NestedRuntime);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(ResolveError::Runtime)?;
    rt.block_on(self.resolve_artifacts(script, gateway))
  }
}

async fn join_packager<T>(task: JoinHandle<Result<T, ResolveError>>) -> Result<T, ResolveError> {
  task.await?
}
