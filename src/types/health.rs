//! Health check payload.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Fixed status literal reported by a running service.
pub const HEALTHY: &str = "healthy";

/// Response of the health operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    /// Current UTC instant, ISO-8601.
    pub timestamp: String,
    pub environment: String,
}

impl HealthStatus {
    /// Snapshot taken now.
    pub fn now(environment: impl Into<String>) -> Self {
        Self {
            status: HEALTHY.to_string(),
            version: crate::PKG_VERSION.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            environment: environment.into(),
        }
    }
}
