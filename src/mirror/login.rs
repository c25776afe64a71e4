//! Logs the local engine into the destination registry

use crate::engine::ContainerEngine;
use crate::error::Result;
use crate::logging::Logger;
use crate::registry::ContainerRegistry;

/// Exchange a control-plane grant for engine credentials and run `docker login`.
pub async fn login_engine(
    registry: &dyn ContainerRegistry,
    engine: &dyn ContainerEngine,
    output: &Logger,
) -> Result<()> {
    output.step("Requesting ECR authorization token");
    let grant = registry.authorization_grant().await?;

    let credentials = grant.credentials()?;
    let endpoint = grant.endpoint()?;
    if let Some(remaining) = grant.remaining_validity() {
        output.detail(&format!(
            "Authorization token valid for {}",
            output.format_duration(remaining)
        ));
    }

    output.step(&format!("Logging in to {}", endpoint));
    engine.login(&credentials, endpoint).await?;
    output.success(&format!("Logged in to {}", endpoint));

    Ok(())
}
