//! Knowledge store health check command

use tracing::info;

use super::{load_config, print_json};

/// Prints the report; exits with an error when the store is empty or a check
/// failed
pub async fn run() -> anyhow::Result<()> {
    let config = load_config()?;

    let store = crate::create_knowledge_store(&config).await?;
    info!(store = store.store_type(), "Checking knowledge store");

    let report = crate::create_store_health_checker(&config, store)
        .check()
        .await?;

    print_json(&report)?;

    if report.is_empty() {
        anyhow::bail!("knowledge store is empty");
    }

    let problems = report.problems();
    if !problems.is_empty() {
        anyhow::bail!("knowledge store check failed: {}", problems.join("; "));
    }

    Ok(())
}
