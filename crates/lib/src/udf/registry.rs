//! Task registry collaborators.
//!
//! The registry owns function sources; this crate only reads from it. Two
//! backends are provided: an in-memory map for embedding and tests, and a
//! read-only directory of JSON records.
//!
//! # Directory Layout
//!
//! ```text
//! {registry}/
//! ├── com.acme.udf.Upper.json    # {"body": "...", "dialect": "java"}
//! └── udfs.tokenize.json         # {"body": "...", "dialect": "python"}
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::types::SourceRecord;

/// Errors raised by a registry backend while looking up a record.
#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("failed to read registry record {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse registry record {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Read-only lookup of function sources by qualified name.
pub trait SourceRegistry: Send + Sync {
  /// Returns `Ok(None)` when no record exists for `qualified_name`.
  fn lookup(&self, qualified_name: &str) -> Result<Option<SourceRecord>, RegistryError>;
}

/// Registry held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
  records: BTreeMap<String, SourceRecord>,
}

impl MemoryRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, qualified_name: impl Into<String>, record: SourceRecord) {
    self.records.insert(qualified_name.into(), record);
  }

  pub fn with(mut self, qualified_name: impl Into<String>, body: &str, dialect: &str) -> Self {
    self.insert(qualified_name, SourceRecord::new(body, dialect));
    self
  }
}

impl SourceRegistry for MemoryRegistry {
  fn lookup(&self, qualified_name: &str) -> Result<Option<SourceRecord>, RegistryError> {
    Ok(self.records.get(qualified_name).cloned())
  }
}

/// Registry backed by a directory of `<qualified_name>.json` files.
#[derive(Debug, Clone)]
pub struct DirRegistry {
  base_path: PathBuf,
}

impl DirRegistry {
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  pub fn base_path(&self) -> &Path {
    &self.base_path
  }

  fn record_path(&self, qualified_name: &str) -> PathBuf {
    self.base_path.join(format!("{}.json", qualified_name))
  }
}

impl SourceRegistry for DirRegistry {
  fn lookup(&self, qualified_name: &str) -> Result<Option<SourceRecord>, RegistryError> {
    // Identifiers never contain path separators; treat such names as absent.
    if qualified_name.contains(['/', '\\']) || qualified_name.starts_with('.') {
      return Ok(None);
    }

    let path = self.record_path(qualified_name);
    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = ?path, "registry record not found");
        return Ok(None);
      }
      Err(source) => return Err(RegistryError::Read { path, source }),
    };

    let record = serde_json::from_str(&content).map_err(|source| RegistryError::Parse { path, source })?;
    Ok(Some(record))
  }
}
