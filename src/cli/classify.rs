//! Classify command

use super::{load_config, print_json};

pub async fn run(query: &str) -> anyhow::Result<()> {
    let config = load_config()?;

    let result = crate::create_intent_classifier(&config)
        .classify(query)
        .await;

    print_json(&result)
}
