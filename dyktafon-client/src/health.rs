//! Service health endpoints
//!
//! Single-shot checks, no retry behavior; suites call these once before
//! spending time on uploads.

use crate::VoiceNotesClient;
use crate::error::Result;
use dyktafon_core::dto::health::HealthReport;

impl VoiceNotesClient {
    /// Check service liveness
    pub async fn health(&self) -> Result<HealthReport> {
        let url = format!("{}/health", self.base_url());
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Check whether the service is ready to accept work
    pub async fn readiness(&self) -> Result<HealthReport> {
        let url = format!("{}/readiness", self.base_url());
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
