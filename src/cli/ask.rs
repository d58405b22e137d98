//! Ask command - one query through the answering pipeline

use super::{load_config, print_json};
use crate::domain::Query;

pub async fn run(query: &str) -> anyhow::Result<()> {
    let config = load_config()?;
    let query = Query::new(query)?;

    let store = crate::create_knowledge_store(&config).await?;
    let orchestrator = crate::create_orchestrator(&config, store).await?;

    let result = orchestrator.run(&query).await?;

    print_json(&result)
}
