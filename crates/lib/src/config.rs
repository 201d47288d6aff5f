//! Resolution configuration.
//!
//! Values come from the environment with sensible defaults; callers such as
//! the CLI override individual fields afterwards.

use std::path::PathBuf;

use crate::consts::{ENV_CLASSPATH, ENV_JAVAC, ENV_SCALAC};
use crate::platform::paths::udf_dir;

/// Default Java compiler binary, looked up on `PATH`.
pub const DEFAULT_JAVAC: &str = "javac";

/// Default Scala compiler binary, looked up on `PATH`.
pub const DEFAULT_SCALAC: &str = "scalac";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveConfig {
  /// Base directory under which all artifact paths are rooted.
  pub udf_path: PathBuf,
  /// Java compiler binary.
  pub javac: String,
  /// Scala compiler binary.
  pub scalac: String,
  /// Extra classpath entries (e.g. the Flink table API jars) for compilation.
  pub classpath: Vec<PathBuf>,
}

impl ResolveConfig {
  /// Load configuration from `UDFPACK_*` environment variables.
  pub fn from_env() -> Self {
    let classpath = std::env::var_os(ENV_CLASSPATH)
      .map(|value| std::env::split_paths(&value).collect())
      .unwrap_or_default();

    Self {
      udf_path: udf_dir(),
      javac: std::env::var(ENV_JAVAC).unwrap_or_else(|_| DEFAULT_JAVAC.to_string()),
      scalac: std::env::var(ENV_SCALAC).unwrap_or_else(|_| DEFAULT_SCALAC.to_string()),
      classpath,
    }
  }

  pub fn with_udf_path(mut self, udf_path: impl Into<PathBuf>) -> Self {
    self.udf_path = udf_path.into();
    self
  }
}

impl Default for ResolveConfig {
  fn default() -> Self {
    Self::from_env()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::consts::ENV_UDF_PATH;
  use serial_test::serial;

  #[test]
  #[serial]
  fn defaults_without_env() {
    temp_env::with_vars(
      [
        (ENV_UDF_PATH, Some("/srv/udf")),
        (ENV_JAVAC, None),
        (ENV_SCALAC, None),
        (ENV_CLASSPATH, None),
      ],
      || {
        let config = ResolveConfig::from_env();
        assert_eq!(config.udf_path, PathBuf::from("/srv/udf"));
        assert_eq!(config.javac, DEFAULT_JAVAC);
        assert_eq!(config.scalac, DEFAULT_SCALAC);
        assert!(config.classpath.is_empty());
      },
    );
  }

  #[test]
  #[serial]
  #[cfg(unix)]
  fn env_overrides_compilers_and_classpath() {
    temp_env::with_vars(
      [
        (ENV_JAVAC, Some("/usr/lib/jvm/bin/javac")),
        (ENV_SCALAC, Some("/opt/scala/bin/scalac")),
        (ENV_CLASSPATH, Some("/opt/flink/lib/a.jar:/opt/flink/lib/b.jar")),
      ],
      || {
        let config = ResolveConfig::from_env();
        assert_eq!(config.javac, "/usr/lib/jvm/bin/javac");
        assert_eq!(config.scalac, "/opt/scala/bin/scalac");
        assert_eq!(
          config.classpath,
          vec![
            PathBuf::from("/opt/flink/lib/a.jar"),
            PathBuf::from("/opt/flink/lib/b.jar")
          ]
        );
      },
    );
  }

  #[test]
  #[serial]
  fn with_udf_path_overrides_env() {
    temp_env::with_var(ENV_UDF_PATH, Some("/srv/udf"), || {
      let config = ResolveConfig::from_env().with_udf_path("/tmp/other");
      assert_eq!(config.udf_path, PathBuf::from("/tmp/other"));
    });
  }
}
