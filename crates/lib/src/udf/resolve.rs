//! Source resolution against the task registry.
//!
//! Each descriptor is looked up by qualified name in order. The first missing
//! record or unrecognized dialect stops the whole run; no partially resolved
//! set is ever returned.

use tracing::debug;

use super::registry::SourceRegistry;
use super::types::{FunctionDescriptor, FunctionLanguage};
use crate::pipeline::ResolveError;

/// Attach registry sources to `descriptors` and refine their languages.
///
/// The registry dialect always wins over the language hint from the script.
pub fn resolve_sources(
  registry: &dyn SourceRegistry,
  descriptors: Vec<FunctionDescriptor>,
) -> Result<Vec<FunctionDescriptor>, ResolveError> {
  descriptors
    .into_iter()
    .map(|descriptor| resolve_one(registry, descriptor))
    .collect()
}

fn resolve_one(
  registry: &dyn SourceRegistry,
  mut descriptor: FunctionDescriptor,
) -> Result<FunctionDescriptor, ResolveError> {
  if !descriptor.has_valid_qualified_name() {
    return Err(ResolveError::InvalidName {
      name: descriptor.qualified_name,
    });
  }

  let record = registry
    .lookup(&descriptor.qualified_name)?
    .ok_or_else(|| ResolveError::UnknownFunction {
      name: descriptor.qualified_name.clone(),
    })?;

  let language: FunctionLanguage = record.dialect.parse().map_err(|_| ResolveError::UnsupportedDialect {
    name: descriptor.qualified_name.clone(),
    dialect: record.dialect.clone(),
  })?;

  if language != descriptor.language {
    debug!(
      function = %descriptor.qualified_name,
      declared = %descriptor.language,
      dialect = %language,
      "registry dialect overrides declared language"
    );
  }

  descriptor.language = language;
  descriptor.source_code = Some(record.body);
  Ok(descriptor)
}
