//! Execution gateway types and the UDF compatibility gate.
//!
//! Each gateway variant carries its own capability tags, so adding a variant
//! forces a decision about UDF support at the match in [`GatewayType::capabilities`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::ResolveError;

/// Where a job will be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GatewayType {
  Local,
  Standalone,
  YarnSession,
  YarnPerJob,
  YarnApplication,
  KubernetesSession,
  KubernetesApplication,
}

/// Semantic tags attached to a gateway type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GatewayCapabilities {
  /// Whether packaged UDF artifacts can be shipped with the job.
  pub supports_udf: bool,
  /// Whether jobs are submitted to a long-running shared session cluster.
  pub session_mode: bool,
}

impl GatewayType {
  pub const ALL: [GatewayType; 7] = [
    GatewayType::Local,
    GatewayType::Standalone,
    GatewayType::YarnSession,
    GatewayType::YarnPerJob,
    GatewayType::YarnApplication,
    GatewayType::KubernetesSession,
    GatewayType::KubernetesApplication,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      GatewayType::Local => "local",
      GatewayType::Standalone => "standalone",
      GatewayType::YarnSession => "yarn-session",
      GatewayType::YarnPerJob => "yarn-per-job",
      GatewayType::YarnApplication => "yarn-application",
      GatewayType::KubernetesSession => "kubernetes-session",
      GatewayType::KubernetesApplication => "kubernetes-application",
    }
  }

  pub fn capabilities(self) -> GatewayCapabilities {
    match self {
      GatewayType::Standalone | GatewayType::YarnSession | GatewayType::KubernetesSession => GatewayCapabilities {
        supports_udf: true,
        session_mode: true,
      },
      GatewayType::Local | GatewayType::YarnPerJob | GatewayType::YarnApplication => GatewayCapabilities {
        supports_udf: true,
        session_mode: false,
      },
      GatewayType::KubernetesApplication => GatewayCapabilities {
        supports_udf: false,
        session_mode: false,
      },
    }
  }
}

impl fmt::Display for GatewayType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown gateway type '{0}'")]
pub struct ParseGatewayError(pub String);

impl FromStr for GatewayType {
  type Err = ParseGatewayError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
    GatewayType::ALL
      .into_iter()
      .find(|g| g.as_str() == normalized)
      .ok_or_else(|| ParseGatewayError(s.to_string()))
  }
}

/// Reject gateway types that cannot ship packaged UDFs.
pub fn check_gateway(gateway: GatewayType) -> Result<(), ResolveError> {
  if gateway.capabilities().supports_udf {
    Ok(())
  } else {
    Err(ResolveError::UnsupportedGateway { gateway })
  }
}
