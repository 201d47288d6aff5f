//! Artifact storage.
//!
//! Provides path resolution for generated artifacts (`<udf path>/udf-<hash>.<ext>`).

use std::path::{Path, PathBuf};

use tracing::debug;

use super::PackageError;
use crate::config::ResolveConfig;
use crate::consts::ARTIFACT_PREFIX;
use crate::util::fs::write_atomic;
use crate::util::hash::ObjectHash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
  /// Compiled JVM functions.
  Archive,
  /// Bundled Python functions.
  Script,
}

impl ArtifactKind {
  pub fn extension(self) -> &'static str {
    match self {
      ArtifactKind::Archive => "jar",
      ArtifactKind::Script => "zip",
    }
  }
}

pub fn artifact_file_name(kind: ArtifactKind, hash: &ObjectHash) -> String {
  format!("{}-{}.{}", ARTIFACT_PREFIX, hash.0, kind.extension())
}

/// The directory all artifact paths are rooted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
  base_path: PathBuf,
}

impl ArtifactStore {
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  pub fn from_config(config: &ResolveConfig) -> Self {
    Self::new(&config.udf_path)
  }

  pub fn base_path(&self) -> &Path {
    &self.base_path
  }

  pub fn artifact_path(&self, kind: ArtifactKind, hash: &ObjectHash) -> PathBuf {
    self.base_path.join(artifact_file_name(kind, hash))
  }

  /// Write an artifact and return its final path.
  pub fn write(&self, kind: ArtifactKind, hash: &ObjectHash, content: &[u8]) -> Result<PathBuf, PackageError> {
    let path = self.artifact_path(kind, hash);
    write_atomic(&path, content)?;
    debug!(path = ?path, bytes = content.len(), "wrote artifact");
    Ok(path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn artifact_paths_are_rooted_at_base() {
    let store = ArtifactStore::new("/opt/udf");
    let hash = ObjectHash("abc123def45678901234".to_string());

    assert_eq!(
      store.artifact_path(ArtifactKind::Archive, &hash),
      PathBuf::from("/opt/udf/udf-abc123def45678901234.jar")
    );
    assert_eq!(
      store.artifact_path(ArtifactKind::Script, &hash),
      PathBuf::from("/opt/udf/udf-abc123def45678901234.zip")
    );
  }

  #[test]
  fn write_creates_base_directory() {
    let temp = tempdir().unwrap();
    let store = ArtifactStore::new(temp.path().join("udf"));
    let hash = ObjectHash("abc123def45678901234".to_string());

    let path = store.write(ArtifactKind::Script, &hash, b"zip bytes").unwrap();

    assert!(path.starts_with(store.base_path()));
    assert_eq!(std::fs::read(path).unwrap(), b"zip bytes");
  }
}
