//! Middleware and telemetry configuration from TOML

use governor_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Built-in global middleware (`[middleware]` section).
///
/// ```toml
/// [middleware]
/// logging = true
/// metrics = true
/// max_payload_bytes = 65536   # enables the payload guard
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMiddlewareConfig {
    pub logging: bool,
    pub metrics: bool,
    pub max_payload_bytes: Option<usize>,
}

impl Default for FileMiddlewareConfig {
    fn default() -> Self {
        Self {
            logging: true,
            metrics: true,
            max_payload_bytes: None,
        }
    }
}

impl FileMiddlewareConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        match self.max_payload_bytes {
            Some(0) => vec![ConfigIssue::error(
                ConfigIssueCode::InvalidPayloadLimit,
                "middleware.max_payload_bytes",
                "must be > 0; a zero limit rejects every invocation",
            )],
            _ => Vec::new(),
        }
    }
}

/// Invocation telemetry (`[telemetry]` section).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTelemetryConfig {
    /// JSONL file receiving one line per invocation
    pub jsonl_path: Option<PathBuf>,
}
