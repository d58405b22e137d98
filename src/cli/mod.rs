//! Command-line entry points
//!
//! - `serve`: HTTP surface
//! - `classify`: classify one query and print the intent
//! - `ask`: answer one query through the full pipeline
//! - `check-store`: inspect the knowledge store

pub mod ask;
pub mod check_store;
pub mod classify;
pub mod serve;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// Cognitive Core - intent classification and grounded answers for student queries
#[derive(Parser)]
#[command(name = "cognitive-core")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Classify a query and print the intent as JSON
    Classify {
        /// Query text
        query: String,
    },

    /// Answer a query with retrieved context and print the result as JSON
    Ask {
        /// Query text
        query: String,
    },

    /// Check that the knowledge store is populated and searchable
    CheckStore,
}

/// Load `.env`, configuration files and environment, then start logging
fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
