//! udfpack-lib: UDF artifact resolution for streaming-SQL job submission
//!
//! This crate turns the user-defined functions referenced by a script into
//! deployable artifacts:
//! - `udf`: function discovery, registry lookup and classification
//! - `package`: compiling JVM functions into an archive and bundling Python functions
//! - `gateway`: execution gateway types and the UDF compatibility gate
//! - `pipeline`: the `UdfResolver` entry point tying the stages together

pub mod config;
pub mod consts;
pub mod gateway;
pub mod package;
pub mod pipeline;
pub mod platform;
pub mod udf;
pub mod util;

pub use config::ResolveConfig;
pub use gateway::GatewayType;
pub use pipeline::{ArtifactResult, ResolveError, UdfResolver};
