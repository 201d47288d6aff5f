//! Implementation of the `udfpack resolve` command.
//!
//! This command reads a script, resolves every function it references against
//! a registry directory and prints the paths of the generated artifacts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use udfpack_lib::udf::registry::DirRegistry;
use udfpack_lib::{GatewayType, ResolveConfig, UdfResolver};

use crate::output::{OutputFormat, print_artifact, print_info, print_json, print_success};

pub fn cmd_resolve(
  file: &Path,
  gateway: GatewayType,
  registry: &Path,
  udf_path: Option<PathBuf>,
  format: OutputFormat,
) -> Result<()> {
  let script = fs::read_to_string(file).with_context(|| format!("Failed to read script: {}", file.display()))?;

  let mut config = ResolveConfig::from_env();
  if let Some(udf_path) = udf_path {
    config = config.with_udf_path(udf_path);
  }
  info!(udf_path = %config.udf_path.display(), registry = %registry.display(), "resolving UDFs");

  let resolver = UdfResolver::from_config(Arc::new(DirRegistry::new(registry)), &config);

  let start = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt
    .block_on(resolver.resolve_artifacts(&script, gateway))
    .context("UDF resolution failed")?;

  if format.is_json() {
    return print_json(&result);
  }

  if result.is_empty() {
    print_info("No UDFs referenced");
    return Ok(());
  }

  print_success(&format!(
    "Packaged UDFs for {} in {}ms",
    gateway,
    start.elapsed().as_millis()
  ));
  for path in result.paths() {
    print_artifact(path);
  }

  Ok(())
}
