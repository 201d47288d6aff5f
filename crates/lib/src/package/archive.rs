//! JVM archive packaging.
//!
//! All JVM functions of a run are written to a scratch source tree, compiled
//! together (one invocation per language) and packed into a single JAR named
//! after the function set's fingerprint. Nothing is written to the artifact
//! store unless every unit compiles.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::bundle::zip_entries;
use super::compiler::{CompilationUnit, CompileBatch, CompileError, CompilerSet, compile_order};
use super::store::{ArtifactKind, ArtifactStore};
use super::{PackageError, check_names, fingerprint};
use crate::pipeline::ResolveError;
use crate::udf::{FunctionDescriptor, FunctionLanguage};

/// Path of the manifest entry inside every archive.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

const MANIFEST_CONTENT: &str = "Manifest-Version: 1.0\r\nCreated-By: udfpack\r\n\r\n";

#[derive(Debug, Clone)]
pub struct ArchivePackager {
  compilers: CompilerSet,
  store: ArtifactStore,
}

impl ArchivePackager {
  pub fn new(compilers: CompilerSet, store: ArtifactStore) -> Self {
    Self { compilers, store }
  }

  /// Compile `group` into one archive and return its path.
  ///
  /// An empty group yields no path and never touches a compiler.
  pub fn package(&self, group: &[FunctionDescriptor]) -> Result<Vec<PathBuf>, ResolveError> {
    if group.is_empty() {
      debug!("no JVM functions, skipping archive");
      return Ok(Vec::new());
    }

    check_names(group)?;
    let hash = fingerprint(group)?;
    let scratch = tempfile::Builder::new()
      .prefix("udfpack-build-")
      .tempdir()
      .map_err(PackageError::from)?;
    let src_dir = scratch.path().join("src");
    let classes_dir = scratch.path().join("classes");
    fs::create_dir_all(&classes_dir).map_err(PackageError::from)?;

    let mut units = group
      .iter()
      .map(|descriptor| {
        CompilationUnit::write(&src_dir, descriptor)
          .map_err(|cause| compilation_error(descriptor.language, vec![descriptor.qualified_name.clone()], cause))
      })
      .collect::<Result<Vec<_>, _>>()?;
    units.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

    let mut languages: Vec<FunctionLanguage> = units.iter().map(|u| u.language).collect();
    languages.sort_by_key(|l| compile_order(*l));
    languages.dedup();

    for language in languages {
      let (own, peers): (Vec<CompilationUnit>, Vec<CompilationUnit>) =
        units.iter().cloned().partition(|u| u.language == language);
      let batch = CompileBatch {
        units: &own,
        peers: &peers,
        src_dir: &src_dir,
        classes_dir: &classes_dir,
      };
      debug!(language = %language, units = own.len(), "compiling batch");

      let compiler = self
        .compilers
        .get(language)
        .map_err(|cause| compilation_error(language, batch.qualified_names(), cause))?;
      compiler
        .compile(&batch)
        .map_err(|cause| compilation_error(language, batch.qualified_names(), cause))?;
    }

    let bytes = jar_classes(&classes_dir)?;
    let path = self.store.write(ArtifactKind::Archive, &hash, &bytes)?;

    info!(path = ?path, functions = group.len(), "packaged JVM functions");
    Ok(vec![path])
  }
}

fn compilation_error(language: FunctionLanguage, units: Vec<String>, cause: CompileError) -> ResolveError {
  ResolveError::Compilation { language, units, cause }
}

/// Pack every file under `classes_dir` into JAR bytes.
fn jar_classes(classes_dir: &Path) -> Result<Vec<u8>, PackageError> {
  let mut entries = vec![(MANIFEST_ENTRY.to_string(), MANIFEST_CONTENT.as_bytes().to_vec())];

  for entry in WalkDir::new(classes_dir).sort_by_file_name() {
    let entry = entry?;
    if !entry.file_type().is_file() {
      continue;
    }

    let rel_path = entry.path().strip_prefix(classes_dir).unwrap_or(entry.path());
    let name = rel_path
      .components()
      .map(|c| c.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");

    entries.push((name, fs::read(entry.path())?));
  }

  zip_entries(entries)
}
