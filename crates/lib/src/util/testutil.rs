//! Test utilities for udfpack-lib.
//!
//! Provides a compiler stand-in so packaging can be exercised without a JDK,
//! plus helpers for inspecting produced zip artifacts.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::package::{CompileBatch, CompileError, Compiler};
use crate::udf::FunctionLanguage;

/// Compiler that writes a fake `.class` file next to where `javac` would.
///
/// The class file holds the unit's source bytes so output follows input.
/// A source line `// uses a.B` must resolve the way a real compiler would:
/// to a unit of the same batch, a class already in the classes dir, or (for
/// Scala) a Java peer whose source is parsed alongside.
pub struct FakeCompiler {
  pub language: FunctionLanguage,
  pub calls: Arc<AtomicUsize>,
  pub fail_on: Option<String>,
}

impl FakeCompiler {
  pub fn new(language: FunctionLanguage) -> Self {
    Self {
      language,
      calls: Arc::new(AtomicUsize::new(0)),
      fail_on: None,
    }
  }

  pub fn failing_on(language: FunctionLanguage, qualified_name: &str) -> Self {
    Self {
      fail_on: Some(qualified_name.to_string()),
      ..Self::new(language)
    }
  }

  fn resolves(&self, name: &str, batch: &CompileBatch<'_>) -> bool {
    batch.units.iter().any(|u| u.qualified_name == name)
      || class_file(batch.classes_dir, name).exists()
      || (self.language == FunctionLanguage::Scala
        && batch
          .peers
          .iter()
          .any(|u| u.language == FunctionLanguage::Java && u.qualified_name == name))
  }
}

fn class_file(classes_dir: &Path, qualified_name: &str) -> PathBuf {
  classes_dir.join(qualified_name.replace('.', "/") + ".class")
}

fn failure(message: String) -> CompileError {
  CompileError::Failed {
    program: "fakec".to_string(),
    code: Some(1),
    stderr: message,
  }
}

impl Compiler for FakeCompiler {
  fn language(&self) -> FunctionLanguage {
    self.language
  }

  fn compile(&self, batch: &CompileBatch<'_>) -> Result<(), CompileError> {
    self.calls.fetch_add(1, Ordering::SeqCst);

    for unit in batch.units {
      if self.fail_on.as_deref() == Some(unit.qualified_name.as_str()) {
        return Err(failure(format!("error: cannot compile {}", unit.qualified_name)));
      }

      let source = fs::read_to_string(&unit.source_path).unwrap();
      for used in source.lines().filter_map(|l| l.trim().strip_prefix("// uses ")) {
        if !self.resolves(used.trim(), batch) {
          return Err(failure(format!("{}: error: cannot find symbol {}", unit.qualified_name, used.trim())));
        }
      }
    }

    for unit in batch.units {
      let class_path = class_file(batch.classes_dir, &unit.qualified_name);
      fs::create_dir_all(class_path.parent().unwrap()).unwrap();
      fs::write(&class_path, fs::read(&unit.source_path).unwrap()).unwrap();
    }
    Ok(())
  }
}

/// Entry names of a zip artifact, in stored order.
pub fn archive_entries(path: &Path) -> Vec<String> {
  let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
  (0..archive.len())
    .map(|i| archive.by_index(i).unwrap().name().to_string())
    .collect()
}

/// Read one entry of a zip artifact as UTF-8.
pub fn read_entry(path: &Path, name: &str) -> String {
  let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
  let mut content = String::new();
  archive.by_name(name).unwrap().read_to_string(&mut content).unwrap();
  content
}
