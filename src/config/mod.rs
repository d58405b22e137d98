//! Application configuration

mod app_config;

pub use app_config::{
    api_key_from_env, AppConfig, ClassifierConfig, EmbeddingConfig, GenerationConfig,
    HttpConfig, KnowledgeStoreConfig, KnowledgeStoreType, LogFormat, LoggingConfig,
    MetricsConfig, ProviderKind, ServerConfig,
};
