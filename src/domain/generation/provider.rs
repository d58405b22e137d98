use async_trait::async_trait;
use std::fmt::Debug;

use super::GenerationRequest;
use crate::domain::DomainError;

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Text produced by a generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    pub model: String,
    pub text: String,
    pub usage: Option<Usage>,
}

impl GenerationResponse {
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: text.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Trait for generative model services (Gemini, OpenAI-compatible, etc.)
#[async_trait]
pub trait GenerationProvider: Send + Sync + Debug {
    /// Issue a single generation call
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model this provider is configured with
    fn model(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    /// Provider returning a canned text and recording the requests it saw
    #[derive(Debug)]
    pub struct MockGenerationProvider {
        name: &'static str,
        text: String,
        error: Option<String>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl MockGenerationProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                text: "mock answer".to_string(),
                error: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_text(mut self, text: impl Into<String>) -> Self {
            self.text = text.into();
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last_request(&self) -> Option<GenerationRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl GenerationProvider for MockGenerationProvider {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, DomainError> {
            self.requests.lock().unwrap().push(request);

            if let Some(ref error) = self.error {
                return Err(DomainError::upstream(self.name, error));
            }

            Ok(GenerationResponse::new("mock-model", self.text.clone()))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }
}
