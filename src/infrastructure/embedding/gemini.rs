//! Gemini `embedContent` embedding provider

use async_trait::async_trait;
use serde::Deserialize;

use super::{validate_vector, HttpClientTrait};
use crate::domain::embedding::{EmbeddingProvider, EmbeddingVector};
use crate::domain::DomainError;

pub(crate) const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_EMBEDDING_MODEL: &str = "text-embedding-004";
const DEFAULT_GEMINI_EMBEDDING_DIMENSIONS: usize = 768;

/// Gemini embedding provider
#[derive(Debug)]
pub struct GeminiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl<C: HttpClientTrait> GeminiEmbeddingProvider<C> {
    /// Create a provider for `text-embedding-004` (768 dimensions)
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_GEMINI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_GEMINI_EMBEDDING_MODEL.to_string(),
            dimensions: DEFAULT_GEMINI_EMBEDDING_DIMENSIONS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    fn embed_url(&self) -> String {
        format!("{}/v1beta/models/{}:embedContent", self.base_url, self.model)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-goog-api-key", self.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": format!("models/{}", self.model),
            "content": {
                "parts": [{"text": text}]
            }
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<EmbeddingVector, DomainError> {
        let response: GeminiEmbedResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::upstream("gemini", format!("Failed to parse embedding response: {}", e))
        })?;

        validate_vector("gemini", response.embedding.values, self.dimensions)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for GeminiEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, DomainError> {
        let url = self.embed_url();
        let body = self.build_request(text);

        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[derive(Debug, Deserialize)]
struct GeminiEmbedResponse {
    embedding: GeminiContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct GeminiContentEmbedding {
    values: Vec<f32>,
}
