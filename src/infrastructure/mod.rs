//! Infrastructure layer - adapters for models, providers and stores

pub mod embedding;
pub mod generation;
pub mod http_client;
pub mod intent;
pub mod knowledge;
pub mod logging;
pub mod metrics;
pub mod services;
