//! Types for UDF artifact resolution.
//!
//! This module defines the error type shared by every pipeline stage and the
//! result handed back to the caller.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::gateway::GatewayType;
use crate::package::{CompileError, PackageError};
use crate::udf::FunctionLanguage;
use crate::udf::registry::RegistryError;

/// Errors that abort a resolution run.
///
/// Every variant is fatal; a run either returns a complete
/// [`ArtifactResult`] or one of these.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// The target gateway cannot ship packaged UDFs.
  #[error("UDFs are not supported on gateway '{gateway}'")]
  UnsupportedGateway { gateway: GatewayType },

  /// A qualified name has a segment that is not an identifier.
  #[error("invalid function identifier '{name}'")]
  InvalidName { name: String },

  /// A referenced function has no registry record.
  #[error("no registry record for function '{name}'")]
  UnknownFunction { name: String },

  /// A registry record names a dialect that is not a known language.
  #[error("function '{name}' has unsupported dialect '{dialect}'")]
  UnsupportedDialect { name: String, dialect: String },

  /// A batch of JVM functions failed to compile.
  #[error("failed to compile {language} functions [{}]: {cause}", .units.join(", "))]
  Compilation {
    language: FunctionLanguage,
    units: Vec<String>,
    #[source]
    cause: CompileError,
  },

  /// The registry backend failed.
  #[error("registry error: {0}")]
  Registry(#[from] RegistryError),

  /// Writing or bundling an artifact failed.
  #[error("packaging error: {0}")]
  Package(#[from] PackageError),

  /// A packaging task panicked or was cancelled.
  #[error("packaging task failed: {0}")]
  Join(#[from] tokio::task::JoinError),

  /// The blocking wrapper was called from inside an async runtime.
  #[error("resolve_artifacts_blocking called from within an async runtime")]
  NestedRuntime,

  /// The blocking wrapper could not start its runtime.
  #[error("failed to create async runtime: {0}")]
  Runtime(#[source] std::io::Error),
}

/// Artifact locations produced by one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactResult {
  archive_paths: Vec<PathBuf>,
  script_paths: Vec<PathBuf>,
}

impl ArtifactResult {
  pub fn new(archive_paths: Vec<PathBuf>, script_paths: Vec<PathBuf>) -> Self {
    Self {
      archive_paths,
      script_paths,
    }
  }

  /// Compiled archives for JVM functions (zero or one).
  pub fn archive_paths(&self) -> &[PathBuf] {
    &self.archive_paths
  }

  /// Script bundles for interpreted functions (zero or one).
  pub fn script_paths(&self) -> &[PathBuf] {
    &self.script_paths
  }

  pub fn is_empty(&self) -> bool {
    self.archive_paths.is_empty() && self.script_paths.is_empty()
  }

  pub fn paths(&self) -> impl Iterator<Item = &Path> {
    self
      .archive_paths
      .iter()
      .chain(self.script_paths.iter())
      .map(PathBuf::as_path)
  }
}
