//! Per-language compilers for JVM functions.
//!
//! Each supported JVM language has one [`Compiler`] implementation; the
//! [`CompilerSet`] maps a function's language to the implementation that
//! builds it. The built-in compilers shell out to `javac` and `scalac`.
//!
//! All units of one language are compiled in a single invocation, so units
//! may reference each other regardless of declaration order. Scala runs
//! before Java: `scalac` parses the Java sources of the run, and `javac`
//! then finds the Scala classes on the classpath.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::ResolveConfig;
use crate::udf::{FunctionDescriptor, FunctionLanguage};

#[derive(Debug, Error)]
pub enum CompileError {
  #[error("no compiler registered for {0}")]
  NoCompiler(FunctionLanguage),

  #[error("'{0}' is not a valid class name")]
  InvalidName(String),

  #[error("failed to write compilation unit {path}: {source}")]
  WriteSource {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid classpath: {0}")]
  Classpath(#[from] std::env::JoinPathsError),

  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("{program} exited with code {code:?}: {stderr}")]
  Failed {
    program: String,
    code: Option<i32>,
    stderr: String,
  },
}

/// One source file synthesized from a resolved function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
  pub qualified_name: String,
  pub language: FunctionLanguage,
  pub source_path: PathBuf,
}

impl CompilationUnit {
  /// Relative source path for a descriptor: `com.acme.Upper` -> `com/acme/Upper.java`.
  pub fn relative_path(descriptor: &FunctionDescriptor) -> PathBuf {
    let mut path: PathBuf = descriptor
      .namespace()
      .map(|ns| ns.split('.').collect())
      .unwrap_or_default();
    path.push(format!(
      "{}.{}",
      descriptor.simple_name(),
      descriptor.language.file_extension()
    ));
    path
  }

  /// Write the descriptor's source under `src_dir` and describe the unit.
  pub fn write(src_dir: &Path, descriptor: &FunctionDescriptor) -> Result<Self, CompileError> {
    if !descriptor.has_valid_qualified_name() {
      return Err(CompileError::InvalidName(descriptor.qualified_name.clone()));
    }

    let source_path = src_dir.join(Self::relative_path(descriptor));
    let write = || -> io::Result<()> {
      if let Some(parent) = source_path.parent() {
        fs::create_dir_all(parent)?;
      }
      fs::write(&source_path, descriptor.source())
    };
    write().map_err(|source| CompileError::WriteSource {
      path: source_path.clone(),
      source,
    })?;

    Ok(Self {
      qualified_name: descriptor.qualified_name.clone(),
      language: descriptor.language,
      source_path,
    })
  }
}

/// Sources handed to one compiler invocation.
#[derive(Debug, Clone, Copy)]
pub struct CompileBatch<'a> {
  /// Units in the compiler's own language.
  pub units: &'a [CompilationUnit],
  /// Units of the other JVM languages in the same run.
  pub peers: &'a [CompilationUnit],
  /// Root all unit sources were written under.
  pub src_dir: &'a Path,
  /// Shared output directory; also on the classpath.
  pub classes_dir: &'a Path,
}

impl CompileBatch<'_> {
  pub fn qualified_names(&self) -> Vec<String> {
    self.units.iter().map(|u| u.qualified_name.clone()).collect()
  }

  fn peer_sources(&self, language: FunctionLanguage) -> impl Iterator<Item = OsString> + '_ {
    self
      .peers
      .iter()
      .filter(move |u| u.language == language)
      .map(|u| u.source_path.clone().into_os_string())
  }
}

/// Compiles every unit of a single JVM language in one pass.
pub trait Compiler: Send + Sync {
  fn language(&self) -> FunctionLanguage;

  /// Compile `batch.units` together, writing class files into `batch.classes_dir`.
  fn compile(&self, batch: &CompileBatch<'_>) -> Result<(), CompileError>;
}

/// Position of `language` in the per-run compile order.
pub fn compile_order(language: FunctionLanguage) -> u8 {
  match language {
    FunctionLanguage::Scala => 0,
    FunctionLanguage::Java => 1,
    FunctionLanguage::Python => 2,
  }
}

/// Build a classpath string with `classes_dir` first.
fn join_classpath(classes_dir: &Path, extra: &[PathBuf]) -> Result<OsString, CompileError> {
  let entries = std::iter::once(classes_dir).chain(extra.iter().map(PathBuf::as_path));
  Ok(std::env::join_paths(entries)?)
}

/// Run a compiler process to completion.
fn run_compiler(program: &str, args: Vec<OsString>) -> Result<(), CompileError> {
  debug!(program = %program, args = ?args, "spawning compiler");

  let output = Command::new(program)
    .args(&args)
    .env("LC_ALL", "C")
    .env("SOURCE_DATE_EPOCH", "315532800")
    .output()
    .map_err(|source| CompileError::Spawn {
      program: program.to_string(),
      source,
    })?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "compiler stdout");
    }
    return Err(CompileError::Failed {
      program: program.to_string(),
      code: output.status.code(),
      stderr,
    });
  }

  Ok(())
}

/// `javac`-backed compiler for Java functions.
#[derive(Debug, Clone)]
pub struct JavacCompiler {
  program: String,
  classpath: Vec<PathBuf>,
}

impl JavacCompiler {
  pub fn new(program: impl Into<String>, classpath: Vec<PathBuf>) -> Self {
    Self {
      program: program.into(),
      classpath,
    }
  }
}

impl Compiler for JavacCompiler {
  fn language(&self) -> FunctionLanguage {
    FunctionLanguage::Java
  }

  fn compile(&self, batch: &CompileBatch<'_>) -> Result<(), CompileError> {
    info!(units = batch.units.len(), "compiling java functions");
    let mut args: Vec<OsString> = vec![
      "-encoding".into(),
      "UTF-8".into(),
      "-nowarn".into(),
      "-d".into(),
      batch.classes_dir.into(),
      "-cp".into(),
      join_classpath(batch.classes_dir, &self.classpath)?,
      "-sourcepath".into(),
      batch.src_dir.into(),
    ];
    args.extend(batch.units.iter().map(|u| u.source_path.clone().into_os_string()));
    run_compiler(&self.program, args)
  }
}

/// `scalac`-backed compiler for Scala functions.
#[derive(Debug, Clone)]
pub struct ScalacCompiler {
  program: String,
  classpath: Vec<PathBuf>,
}

impl ScalacCompiler {
  pub fn new(program: impl Into<String>, classpath: Vec<PathBuf>) -> Self {
    Self {
      program: program.into(),
      classpath,
    }
  }
}

impl Compiler for ScalacCompiler {
  fn language(&self) -> FunctionLanguage {
    FunctionLanguage::Scala
  }

  fn compile(&self, batch: &CompileBatch<'_>) -> Result<(), CompileError> {
    info!(units = batch.units.len(), "compiling scala functions");
    let mut args: Vec<OsString> = vec![
      "-nowarn".into(),
      "-d".into(),
      batch.classes_dir.into(),
      "-classpath".into(),
      join_classpath(batch.classes_dir, &self.classpath)?,
    ];
    args.extend(batch.units.iter().map(|u| u.source_path.clone().into_os_string()));
    // Java sources are only parsed for their signatures; javac emits them later.
    args.extend(batch.peer_sources(FunctionLanguage::Java));
    run_compiler(&self.program, args)
  }
}

/// Mapping from language to the compiler that builds it.
#[derive(Clone, Default)]
pub struct CompilerSet {
  compilers: HashMap<FunctionLanguage, Arc<dyn Compiler>>,
}

impl CompilerSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// The built-in `javac` and `scalac` compilers, configured from `config`.
  pub fn from_config(config: &ResolveConfig) -> Self {
    Self::new()
      .with(JavacCompiler::new(&config.javac, config.classpath.clone()))
      .with(ScalacCompiler::new(&config.scalac, config.classpath.clone()))
  }

  /// Register `compiler` for its language, replacing any previous one.
  pub fn register(&mut self, compiler: Arc<dyn Compiler>) {
    self.compilers.insert(compiler.language(), compiler);
  }

  pub fn with(mut self, compiler: impl Compiler + 'static) -> Self {
    self.register(Arc::new(compiler));
    self
  }

  pub fn get(&self, language: FunctionLanguage) -> Result<&dyn Compiler, CompileError> {
    self
      .compilers
      .get(&language)
      .map(|c| c.as_ref())
      .ok_or(CompileError::NoCompiler(language))
  }

  pub fn languages(&self) -> Vec<FunctionLanguage> {
    let mut languages: Vec<_> = self.compilers.keys().copied().collect();
    languages.sort();
    languages
  }
}

impl std::fmt::Debug for CompilerSet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CompilerSet").field("languages", &self.languages()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn relative_path_follows_package() {
    let java = FunctionDescriptor::new("f", "com.acme.udf.Upper", FunctionLanguage::Java);
    assert_eq!(
      CompilationUnit::relative_path(&java),
      PathBuf::from("com").join("acme").join("udf").join("Upper.java")
    );

    let scala = FunctionDescriptor::new("g", "Lower", FunctionLanguage::Scala);
    assert_eq!(CompilationUnit::relative_path(&scala), PathBuf::from("Lower.scala"));
  }

  #[test]
  fn write_places_source_under_src_dir() {
    let temp = tempdir().unwrap();
    let descriptor =
      FunctionDescriptor::new("f", "com.acme.Upper", FunctionLanguage::Java).with_source("public class Upper {}");

    let unit = CompilationUnit::write(temp.path(), &descriptor).unwrap();

    assert_eq!(unit.qualified_name, "com.acme.Upper");
    assert!(unit.source_path.starts_with(temp.path()));
    assert_eq!(fs::read_to_string(&unit.source_path).unwrap(), "public class Upper {}");
  }

  #[test]
  fn set_selects_by_language() {
    let set = CompilerSet::new().with(JavacCompiler::new("javac", vec![]));

    assert_eq!(set.get(FunctionLanguage::Java).unwrap().language(), FunctionLanguage::Java);
    assert!(matches!(
      set.get(FunctionLanguage::Scala),
      Err(CompileError::NoCompiler(FunctionLanguage::Scala))
    ));
  }

  #[test]
  fn from_config_registers_builtin_languages() {
    let config = ResolveConfig {
      udf_path: PathBuf::from("/tmp/udf"),
      javac: "javac".to_string(),
      scalac: "scalac".to_string(),
      classpath: vec![],
    };

    assert_eq!(
      CompilerSet::from_config(&config).languages(),
      vec![FunctionLanguage::Java, FunctionLanguage::Scala]
    );
  }

  #[test]
  fn write_refuses_names_that_leave_src_dir() {
    let temp = tempdir().unwrap();
    let src_dir = temp.path().join("scratch").join("src");

    for name in ["a/../../../escaped.Evil", "/escaped.Evil", "x...Evil"] {
      let descriptor = FunctionDescriptor::new("f", name, FunctionLanguage::Java).with_source("class Evil {}");
      let err = CompilationUnit::write(&src_dir, &descriptor).unwrap_err();
      assert!(matches!(err, CompileError::InvalidName(ref n) if n == name));
    }

    assert!(!temp.path().join("escaped").exists());
    assert!(!src_dir.exists());
  }

  #[test]
  fn compile_order_puts_scala_before_java() {
    let mut languages = vec![FunctionLanguage::Java, FunctionLanguage::Scala];
    languages.sort_by_key(|l| compile_order(*l));
    assert_eq!(languages, vec![FunctionLanguage::Scala, FunctionLanguage::Java]);
  }

  #[test]
  fn missing_compiler_binary_is_a_spawn_error() {
    let temp = tempdir().unwrap();
    let src_dir = temp.path().join("src");
    let classes_dir = temp.path().join("classes");
    let descriptor = FunctionDescriptor::new("f", "A", FunctionLanguage::Java).with_source("class A {}");
    let units = [CompilationUnit::write(&src_dir, &descriptor).unwrap()];
    let compiler = JavacCompiler::new("udfpack-no-such-javac", vec![]);

    let batch = CompileBatch {
      units: &units,
      peers: &[],
      src_dir: &src_dir,
      classes_dir: &classes_dir,
    };
    let err = compiler.compile(&batch).unwrap_err();

    assert!(matches!(err, CompileError::Spawn { ref program, .. } if program == "udfpack-no-such-javac"));
  }

  #[cfg(unix)]
  #[test]
  fn nonzero_exit_is_a_failure_with_stderr() {
    let err = run_compiler("/bin/sh", vec!["-c".into(), "echo broken >&2; exit 3".into()]).unwrap_err();

    assert!(matches!(err, CompileError::Failed { code: Some(3), ref stderr, .. } if stderr == "broken"));
  }
}
