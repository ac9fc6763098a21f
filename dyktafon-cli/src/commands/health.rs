//! Health command handler

use anyhow::Result;
use colored::*;

use crate::config::Config;

/// Check service health and readiness
pub async fn handle_health(config: &Config) -> Result<()> {
    let client = config.client();

    let health = client
        .health()
        .await
        .map_err(|e| anyhow::anyhow!("Service unreachable at {}: {}", config.base_url, e))?;

    if health.is_healthy() {
        println!("{} Service is {}", "✓".green(), health.status.green());
    } else {
        println!("{} Service reports {}", "✗".red(), health.status.red());
    }
    if let Some(version) = &health.version {
        println!("  Version: {}", version.dimmed());
    }

    let readiness = client.readiness().await?;
    if readiness.is_healthy() {
        println!("{} Ready to accept uploads", "✓".green());
        Ok(())
    } else {
        anyhow::bail!("Service is up but not ready: {}", readiness.status)
    }
}
