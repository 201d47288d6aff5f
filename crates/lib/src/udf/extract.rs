//! Function reference extraction.
//!
//! Scans script text for function DDL of the form
//!
//! ```text
//! CREATE [TEMPORARY [SYSTEM]] FUNCTION [IF NOT EXISTS] <name> AS '<identifier>' [LANGUAGE <lang>]
//! ```
//!
//! Extraction is total and deterministic: malformed text simply yields fewer
//! matches, and the output order is the order of first occurrence.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::types::{FunctionDescriptor, FunctionLanguage};

/// Language assumed when a statement has no `LANGUAGE` clause.
pub const DEFAULT_LANGUAGE: FunctionLanguage = FunctionLanguage::Java;

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));

static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"--[^\n]*").expect("valid line comment regex"));

static CREATE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r#"(?i)\bCREATE\s+(?:TEMPORARY\s+(?:SYSTEM\s+)?)?FUNCTION\s+(?:IF\s+NOT\s+EXISTS\s+)?([`\w.]+)\s+AS\s+(?:'([^']*)'|"([^"]*)")(?:\s+LANGUAGE\s+(\w+))?"#,
  )
  .expect("valid create function regex")
});

/// Extract the distinct functions referenced by `script`.
pub fn extract_functions(script: &str) -> Vec<FunctionDescriptor> {
  let without_blocks = BLOCK_COMMENT.replace_all(script, " ");
  let text = LINE_COMMENT.replace_all(&without_blocks, "");

  let mut seen = HashSet::new();
  let mut functions = Vec::new();

  for caps in CREATE_FUNCTION.captures_iter(&text) {
    let name = caps[1].trim_matches('`').to_string();
    let qualified_name = caps
      .get(2)
      .or_else(|| caps.get(3))
      .map(|m| m.as_str().trim())
      .unwrap_or_default();

    if qualified_name.is_empty() {
      warn!(function = %name, "skipping function with empty identifier");
      continue;
    }

    if !seen.insert(qualified_name.to_string()) {
      continue;
    }

    let language = match caps.get(4) {
      Some(lang) => lang.as_str().parse().unwrap_or_else(|_| {
        warn!(function = %name, language = %lang.as_str(), "unknown language hint, assuming {}", DEFAULT_LANGUAGE);
        DEFAULT_LANGUAGE
      }),
      None => DEFAULT_LANGUAGE,
    };

    debug!(function = %name, identifier = %qualified_name, language = %language, "found function reference");
    functions.push(FunctionDescriptor::new(name, qualified_name, language));
  }

  functions
}
