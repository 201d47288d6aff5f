//! End-to-end resolution through the public API.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use udfpack_lib::package::{ArtifactStore, CompileBatch, CompileError, Compiler, CompilerSet};
use udfpack_lib::udf::FunctionLanguage;
use udfpack_lib::udf::registry::MemoryRegistry;
use udfpack_lib::{GatewayType, ResolveError, UdfResolver};

/// Copies each source file into the classes dir as `<Name>.class`.
struct CopyCompiler {
  language: FunctionLanguage,
  batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Compiler for CopyCompiler {
  fn language(&self) -> FunctionLanguage {
    self.language
  }

  fn compile(&self, batch: &CompileBatch<'_>) -> Result<(), CompileError> {
    self.batches.lock().unwrap().push(batch.qualified_names());
    for unit in batch.units {
      let target = batch.classes_dir.join(unit.qualified_name.replace('.', "/") + ".class");
      fs::create_dir_all(target.parent().unwrap()).unwrap();
      fs::copy(&unit.source_path, target).unwrap();
    }
    Ok(())
  }
}

fn entries(path: &Path) -> Vec<String> {
  let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
  (0..archive.len())
    .map(|i| archive.by_index(i).unwrap().name().to_string())
    .collect()
}

fn entry(path: &Path, name: &str) -> String {
  let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
  let mut content = String::new();
  archive.by_name(name).unwrap().read_to_string(&mut content).unwrap();
  content
}

const SCRIPT: &str = r#"
-- functions used by the job
CREATE TEMPORARY FUNCTION upper_case AS 'com.acme.udf.Upper';
CREATE FUNCTION IF NOT EXISTS wrap AS 'com.acme.udf.Wrap' LANGUAGE SCALA;
CREATE TEMPORARY SYSTEM FUNCTION tokenize AS 'udfs.text.tokenize' LANGUAGE PYTHON;

INSERT INTO sink SELECT upper_case(tokenize(line)) FROM source;
"#;

fn resolver(udf_path: &Path) -> (UdfResolver, Arc<Mutex<Vec<Vec<String>>>>) {
  let registry = MemoryRegistry::new()
    .with("com.acme.udf.Upper", "public class Upper {}", "java")
    .with("com.acme.udf.Wrap", "object Wrap", "scala")
    .with("udfs.text.tokenize", "def tokenize(line):\n    return line.split()", "python");

  let batches = Arc::new(Mutex::new(Vec::new()));
  let compilers = CompilerSet::new()
    .with(CopyCompiler {
      language: FunctionLanguage::Java,
      batches: Arc::clone(&batches),
    })
    .with(CopyCompiler {
      language: FunctionLanguage::Scala,
      batches: Arc::clone(&batches),
    });

  let resolver = UdfResolver::new(Arc::new(registry), compilers, ArtifactStore::new(udf_path));
  (resolver, batches)
}

#[tokio::test]
async fn mixed_script_yields_one_archive_and_one_bundle() {
  let temp = TempDir::new().unwrap();
  let (resolver, batches) = resolver(temp.path());

  let result = resolver
    .resolve_artifacts(SCRIPT, GatewayType::YarnSession)
    .await
    .unwrap();

  assert_eq!(result.archive_paths().len(), 1);
  assert_eq!(result.script_paths().len(), 1);
  // one batch per language, Scala first
  assert_eq!(
    *batches.lock().unwrap(),
    vec![vec!["com.acme.udf.Wrap".to_string()], vec!["com.acme.udf.Upper".to_string()]]
  );

  let jar = &result.archive_paths()[0];
  assert!(jar.starts_with(temp.path()));
  assert_eq!(jar.extension().unwrap(), "jar");
  let jar_entries = entries(jar);
  assert!(jar_entries.contains(&"META-INF/MANIFEST.MF".to_string()));
  assert!(jar_entries.contains(&"com/acme/udf/Upper.class".to_string()));
  assert!(jar_entries.contains(&"com/acme/udf/Wrap.class".to_string()));

  let bundle = &result.script_paths()[0];
  assert_eq!(bundle.extension().unwrap(), "zip");
  assert!(entry(bundle, "udfs/text.py").contains("def tokenize(line)"));
}

#[tokio::test]
async fn kubernetes_application_is_rejected_before_any_work() {
  let temp = TempDir::new().unwrap();
  let udf_path = temp.path().join("udf");
  let (resolver, batches) = resolver(&udf_path);

  let err = resolver
    .resolve_artifacts(SCRIPT, GatewayType::KubernetesApplication)
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    ResolveError::UnsupportedGateway {
      gateway: GatewayType::KubernetesApplication
    }
  ));
  assert!(batches.lock().unwrap().is_empty());
  assert!(!udf_path.exists());
}

#[test]
fn identical_inputs_produce_identical_artifacts() {
  let first = TempDir::new().unwrap();
  let second = TempDir::new().unwrap();

  let a = resolver(first.path())
    .0
    .resolve_artifacts_blocking(SCRIPT, GatewayType::Local)
    .unwrap();
  let b = resolver(second.path())
    .0
    .resolve_artifacts_blocking(SCRIPT, GatewayType::Local)
    .unwrap();

  let names = |paths: &[std::path::PathBuf]| -> Vec<_> { paths.iter().map(|p| p.file_name().unwrap().to_owned()).collect() };
  assert_eq!(names(a.archive_paths()), names(b.archive_paths()));
  assert_eq!(names(a.script_paths()), names(b.script_paths()));

  for (x, y) in a.paths().zip(b.paths()) {
    assert_eq!(fs::read(x).unwrap(), fs::read(y).unwrap());
  }
}
