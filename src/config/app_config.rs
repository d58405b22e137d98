use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{DistanceMetric, DomainError};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub classifier: ClassifierConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub knowledge_store: KnowledgeStoreConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and expose `/metrics`
    pub enabled: bool,
}

/// Local intent model
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Directory holding `tokenizer.json`, `model.onnx` and `label_map.json`
    pub model_dir: PathBuf,
    /// Token sequence length the model was exported with
    pub max_length: usize,
}

/// Which remote API family a provider speaks
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    #[serde(alias = "open_ai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: ProviderKind,
    pub base_url: Option<String>,
    pub model: String,
    pub dimensions: usize,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub provider: ProviderKind,
    pub base_url: Option<String>,
    pub model: String,
    pub api_key_env: String,
    /// Persona named in the system instruction
    pub assistant_name: String,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeStoreType {
    #[default]
    InMemory,
    Pgvector,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeStoreConfig {
    #[serde(rename = "type")]
    pub store_type: KnowledgeStoreType,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub table: String,
    pub metric: DistanceMetric,
    /// Number of passages retrieved per query
    pub top_k: usize,
    /// JSON array of knowledge nodes seeding the in-memory store
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout for outbound embedding and generation calls
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models/intent-classifier"),
            max_length: 64,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            base_url: None,
            model: "text-embedding-004".to_string(),
            dimensions: 768,
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            base_url: None,
            model: "gemini-1.5-pro".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            assistant_name: "Student Resource Hub AI".to_string(),
            max_output_tokens: None,
        }
    }
}

impl Default for KnowledgeStoreConfig {
    fn default() -> Self {
        Self {
            store_type: KnowledgeStoreType::InMemory,
            database_url: None,
            max_connections: 5,
            table: "knowledge_nodes".to_string(),
            metric: DistanceMetric::Cosine,
            top_k: 5,
            snapshot_path: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

/// Read an API key from the environment variable named in configuration
pub fn api_key_from_env(var: &str) -> Result<String, DomainError> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(DomainError::configuration(format!(
            "Environment variable {} is not set",
            var
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.classifier.max_length, 64);
        assert_eq!(config.embedding.model, "text-embedding-004");
        assert_eq!(config.embedding.dimensions, 768);
        assert_eq!(config.generation.model, "gemini-1.5-pro");
        assert_eq!(config.knowledge_store.top_k, 5);
        assert_eq!(config.knowledge_store.metric, DistanceMetric::Cosine);
        assert_eq!(
            config.knowledge_store.store_type,
            KnowledgeStoreType::InMemory
        );
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"{
                    "knowledge_store": {"type": "pgvector", "metric": "euclidean", "top_k": 3},
                    "embedding": {"provider": "openai", "model": "text-embedding-3-small", "dimensions": 1536}
                }"#,
                config::FileFormat::Json,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(
            config.knowledge_store.store_type,
            KnowledgeStoreType::Pgvector
        );
        assert_eq!(config.knowledge_store.metric, DistanceMetric::Euclidean);
        assert_eq!(config.knowledge_store.top_k, 3);
        assert_eq!(config.knowledge_store.table, "knowledge_nodes");
        assert_eq!(config.embedding.provider, ProviderKind::OpenAi);
        assert_eq!(config.embedding.dimensions, 1536);
        assert_eq!(config.generation.provider, ProviderKind::Gemini);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_missing_api_key_env() {
        let result = api_key_from_env("COGNITIVE_CORE_TEST_KEY_THAT_IS_NEVER_SET");

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
