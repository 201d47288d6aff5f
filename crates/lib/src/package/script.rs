//! Python bundle packaging.
//!
//! Python functions are identified as `module.function`; every distinct module
//! becomes one `.py` file in a zip bundle shipped alongside the job.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, info};

use super::bundle::zip_entries;
use super::{check_names, fingerprint};
use super::store::{ArtifactKind, ArtifactStore};
use crate::pipeline::ResolveError;
use crate::udf::FunctionDescriptor;

#[derive(Debug, Clone)]
pub struct ScriptPackager {
  store: ArtifactStore,
}

impl ScriptPackager {
  pub fn new(store: ArtifactStore) -> Self {
    Self { store }
  }

  /// Bundle `group` into one script artifact and return its path.
  pub fn package(&self, group: &[FunctionDescriptor]) -> Result<Vec<PathBuf>, ResolveError> {
    if group.is_empty() {
      debug!("no interpreted functions, skipping script bundle");
      return Ok(Vec::new());
    }

    check_names(group)?;
    let hash = fingerprint(group)?;
    let entries = module_files(group)
      .into_iter()
      .map(|(name, content)| (name, content.into_bytes()))
      .collect();
    let bytes = zip_entries(entries)?;
    let path = self.store.write(ArtifactKind::Script, &hash, &bytes)?;

    info!(path = ?path, functions = group.len(), "packaged interpreted functions");
    Ok(vec![path])
  }
}

/// Bundle file name for a function: `pkg.mod.func` -> `pkg/mod.py`.
pub fn module_file_name(descriptor: &FunctionDescriptor) -> String {
  let module = descriptor.namespace().unwrap_or(&descriptor.qualified_name);
  format!("{}.{}", module.replace('.', "/"), descriptor.language.file_extension())
}

/// Group function bodies by module file.
///
/// Distinct bodies for the same module are joined in order with a blank line;
/// a body already present in the module is not repeated.
fn module_files(group: &[FunctionDescriptor]) -> BTreeMap<String, String> {
  let mut modules: BTreeMap<String, Vec<&str>> = BTreeMap::new();

  for descriptor in group {
    let body = descriptor.source().trim_end();
    let bodies = modules.entry(module_file_name(descriptor)).or_default();
    if !bodies.contains(&body) {
      bodies.push(body);
    }
  }

  modules
    .into_iter()
    .map(|(name, bodies)| (name, format!("{}\n", bodies.join("\n\n"))))
    .collect()
}
