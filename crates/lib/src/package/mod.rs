//! Artifact packaging.
//!
//! Each run produces at most one archive (compiled JVM functions) and at most
//! one script bundle (Python functions). Both are named after a fingerprint of
//! the function set they contain, so the same set always lands at the same path.
//!
//! # Submodules
//!
//! - [`compiler`] - Per-language compiler capability and built-in implementations
//! - [`archive`] - JVM archive packager
//! - [`script`] - Python bundle packager
//! - [`store`] - Artifact path composition and atomic writes

pub mod archive;
mod bundle;
pub mod compiler;
pub mod script;
pub mod store;

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::pipeline::ResolveError;
use crate::udf::{FunctionDescriptor, FunctionLanguage};
use crate::util::hash::{HashError, Hashable, ObjectHash};

pub use archive::ArchivePackager;
pub use compiler::{
  CompilationUnit, CompileBatch, CompileError, Compiler, CompilerSet, JavacCompiler, ScalacCompiler, compile_order,
};
pub use script::ScriptPackager;
pub use store::{ArtifactKind, ArtifactStore};

/// Errors raised while writing or bundling artifacts.
#[derive(Debug, Error)]
pub enum PackageError {
  #[error("io error: {0}")]
  Io(#[from] io::Error),

  #[error("failed to write zip archive: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("failed to walk compiled classes: {0}")]
  Walk(#[from] walkdir::Error),

  #[error("failed to fingerprint function set: {0}")]
  Fingerprint(#[from] HashError),
}

#[derive(Serialize)]
struct FingerprintEntry<'a> {
  qualified_name: &'a str,
  language: FunctionLanguage,
  source: &'a str,
}

/// Reject a group whose qualified names cannot be laid out as package paths.
pub(crate) fn check_names(group: &[FunctionDescriptor]) -> Result<(), ResolveError> {
  match group.iter().find(|d| !d.has_valid_qualified_name()) {
    Some(bad) => Err(ResolveError::InvalidName {
      name: bad.qualified_name.clone(),
    }),
    None => Ok(()),
  }
}

/// Fingerprint a function group independently of its order.
pub fn fingerprint(group: &[FunctionDescriptor]) -> Result<ObjectHash, PackageError> {
  let mut entries: Vec<FingerprintEntry<'_>> = group
    .iter()
    .map(|d| FingerprintEntry {
      qualified_name: &d.qualified_name,
      language: d.language,
      source: d.source(),
    })
    .collect();
  entries.sort_by(|a, b| a.qualified_name.cmp(b.qualified_name));
  Ok(entries[..].compute_hash()?)
}
