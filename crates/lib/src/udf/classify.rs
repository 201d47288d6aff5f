use super::types::FunctionDescriptor;

/// Resolved functions split by packaging strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
  /// Compiled into the archive.
  pub jvm: Vec<FunctionDescriptor>,
  /// Bundled into the script package.
  pub interpreted: Vec<FunctionDescriptor>,
}

/// Partition resolved functions into JVM and interpreted groups.
///
/// Relative order is preserved within each group.
pub fn classify(descriptors: Vec<FunctionDescriptor>) -> Classified {
  let (jvm, interpreted) = descriptors.into_iter().partition(|d| d.language.is_jvm());
  Classified { jvm, interpreted }
}
