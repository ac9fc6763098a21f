//! Health and readiness payloads

use serde::Deserialize;

/// Response from the `/health` and `/readiness` endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok" | "ready")
    }
}
