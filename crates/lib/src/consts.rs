/// Application name used for data directories.
pub const APP_NAME: &str = "udfpack";

/// Length of the truncated hash used in artifact file names.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Directory under the data dir holding generated UDF artifacts.
pub const UDF_DIR: &str = "udf";

/// File name prefix shared by every generated artifact.
pub const ARTIFACT_PREFIX: &str = "udf";

/// Environment variable overriding the UDF artifact base path.
pub const ENV_UDF_PATH: &str = "UDFPACK_UDF_PATH";

/// Environment variable naming the Java compiler binary.
pub const ENV_JAVAC: &str = "UDFPACK_JAVAC";

/// Environment variable naming the Scala compiler binary.
pub const ENV_SCALAC: &str = "UDFPACK_SCALAC";

/// Environment variable with extra classpath entries for UDF compilation.
pub const ENV_CLASSPATH: &str = "UDFPACK_CLASSPATH";
