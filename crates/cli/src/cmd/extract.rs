use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use udfpack_lib::udf::extract::extract_functions;

use crate::output::{OutputFormat, print_info, print_json};

pub fn cmd_extract(file: &Path, format: OutputFormat) -> Result<()> {
  let script = fs::read_to_string(file).with_context(|| format!("Failed to read script: {}", file.display()))?;
  let functions = extract_functions(&script);

  if format.is_json() {
    return print_json(&functions);
  }

  if functions.is_empty() {
    print_info("No UDFs referenced");
    return Ok(());
  }

  for function in &functions {
    println!("{}\t{}\t{}", function.name, function.qualified_name, function.language);
  }
  Ok(())
}
