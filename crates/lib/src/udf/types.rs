use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Implementation language of a user-defined function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionLanguage {
  Java,
  Scala,
  Python,
}

impl FunctionLanguage {
  pub fn as_str(self) -> &'static str {
    match self {
      FunctionLanguage::Java => "java",
      FunctionLanguage::Scala => "scala",
      FunctionLanguage::Python => "python",
    }
  }

  /// Languages compiled to JVM bytecode and shipped in the archive.
  pub fn is_jvm(self) -> bool {
    matches!(self, FunctionLanguage::Java | FunctionLanguage::Scala)
  }

  /// Languages shipped as source in the script bundle.
  pub fn is_interpreted(self) -> bool {
    !self.is_jvm()
  }

  /// Source file extension for a compilation or bundle unit.
  pub fn file_extension(self) -> &'static str {
    match self {
      FunctionLanguage::Java => "java",
      FunctionLanguage::Scala => "scala",
      FunctionLanguage::Python => "py",
    }
  }
}

impl fmt::Display for FunctionLanguage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized function language '{0}'")]
pub struct ParseLanguageError(pub String);

impl FromStr for FunctionLanguage {
  type Err = ParseLanguageError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "java" => Ok(FunctionLanguage::Java),
      "scala" => Ok(FunctionLanguage::Scala),
      "python" => Ok(FunctionLanguage::Python),
      _ => Err(ParseLanguageError(s.to_string())),
    }
  }
}

/// A function referenced by a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
  /// Function name as registered in the script (`CREATE FUNCTION <name>`).
  pub name: String,
  /// Implementation identifier (`AS '<qualified_name>'`); the registry key.
  pub qualified_name: String,
  /// Declared language, refined from the registry dialect during resolution.
  pub language: FunctionLanguage,
  /// Source body, attached during resolution.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub source_code: Option<String>,
}

impl FunctionDescriptor {
  pub fn new(name: impl Into<String>, qualified_name: impl Into<String>, language: FunctionLanguage) -> Self {
    Self {
      name: name.into(),
      qualified_name: qualified_name.into(),
      language,
      source_code: None,
    }
  }

  pub fn with_source(mut self, source_code: impl Into<String>) -> Self {
    self.source_code = Some(source_code.into());
    self
  }

  /// The source body, or an empty string for unresolved descriptors.
  pub fn source(&self) -> &str {
    self.source_code.as_deref().unwrap_or_default()
  }

  /// Last `.`-separated segment of the qualified name.
  pub fn simple_name(&self) -> &str {
    self
      .qualified_name
      .rsplit_once('.')
      .map(|(_, simple)| simple)
      .unwrap_or(&self.qualified_name)
  }

  /// Everything before the last `.` of the qualified name, if any.
  pub fn namespace(&self) -> Option<&str> {
    self.qualified_name.rsplit_once('.').map(|(ns, _)| ns)
  }

  /// Whether the qualified name maps safely onto package directories.
  pub fn has_valid_qualified_name(&self) -> bool {
    is_qualified_identifier(&self.qualified_name)
  }
}

/// `true` when every `.`-separated segment matches `[A-Za-z_$][A-Za-z0-9_$]*`.
pub fn is_qualified_identifier(name: &str) -> bool {
  name.split('.').all(|segment| {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
      && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
  })
}

/// A registry entry backing one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
  pub body: String,
  pub dialect: String,
}

impl SourceRecord {
  pub fn new(body: impl Into<String>, dialect: impl Into<String>) -> Self {
    Self {
      body: body.into(),
      dialect: dialect.into(),
    }
  }
}
