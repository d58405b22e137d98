//! Gemini `generateContent` provider

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::generation::{
    GenerationProvider, GenerationRequest, GenerationResponse, PromptRole, Usage,
};
use crate::domain::DomainError;
use crate::infrastructure::embedding::DEFAULT_GEMINI_BASE_URL;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Gemini generative model provider
#[derive(Debug)]
pub struct GeminiGenerationProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> GeminiGenerationProvider<C> {
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
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-goog-api-key", self.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, request: &GenerationRequest) -> serde_json::Value {
        let system_texts: Vec<serde_json::Value> = request
            .parts
            .iter()
            .filter(|p| p.role == PromptRole::System)
            .map(|p| serde_json::json!({"text": p.text}))
            .collect();

        let contents: Vec<serde_json::Value> = request
            .parts
            .iter()
            .filter(|p| p.role == PromptRole::User)
            .map(|p| serde_json::json!({"role": "user", "parts": [{"text": p.text}]}))
            .collect();

        let mut generation_config = serde_json::json!({
            "temperature": request.temperature,
        });

        if let Some(max_tokens) = request.max_output_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if !system_texts.is_empty() {
            body["systemInstruction"] = serde_json::json!({"parts": system_texts});
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<GenerationResponse, DomainError> {
        let response: GeminiGenerateResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::upstream("gemini", format!("Failed to parse response: {}", e))
        })?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::upstream("gemini", "No candidates in response"))?;

        let finish_reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        let texts: Vec<String> = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if texts.is_empty() {
            return Err(DomainError::upstream(
                "gemini",
                format!("Candidate has no text (finish reason: {})", finish_reason),
            ));
        }

        let text = texts.concat();

        let mut generation = GenerationResponse::new(&self.model, text);

        if let Some(usage) = response.usage_metadata {
            generation = generation.with_usage(Usage {
                prompt_tokens: usage.prompt_token_count,
                completion_tokens: usage.candidates_token_count,
            });
        }

        Ok(generation)
    }
}

#[async_trait]
impl<C: HttpClientTrait> GenerationProvider for GeminiGenerationProvider<C> {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, DomainError> {
        let url = self.generate_url();
        let body = self.build_request(&request);

        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}
