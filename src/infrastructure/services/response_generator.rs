use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::domain::{
    DomainError, GenerationProvider, GenerationRequest, Intent, RetrievedContext,
};
use crate::infrastructure::metrics::{self, UpstreamCallMetricParams};

/// Sampling temperature for every answer
pub const GENERATION_TEMPERATURE: f32 = 0.2;

/// Builds the grounded prompt and calls the generative model
#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    provider: Arc<dyn GenerationProvider>,
    assistant_name: String,
    max_output_tokens: Option<u32>,
}

impl ResponseGenerator {
    pub fn new(provider: Arc<dyn GenerationProvider>, assistant_name: impl Into<String>) -> Self {
        Self {
            provider,
            assistant_name: assistant_name.into(),
            max_output_tokens: None,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// System instruction naming the persona and intent. The `Context:` block
    /// is present only when passages were retrieved.
    pub fn system_instruction(&self, context: &RetrievedContext, intent: Intent) -> String {
        let mut instruction = format!(
            "You are the {}.\nIntent: {}\n",
            self.assistant_name, intent
        );

        if !context.is_empty() {
            instruction.push_str("Context:\n");
            instruction.push_str(&context.render());
            instruction.push('\n');
        }

        instruction.push_str("\nAnswer the user query based strictly on context.");
        instruction
    }

    /// Ordered parts: system instruction, then the query
    pub fn build_request(
        &self,
        query: &str,
        context: &RetrievedContext,
        intent: Intent,
    ) -> GenerationRequest {
        let mut builder = GenerationRequest::builder()
            .system(self.system_instruction(context, intent))
            .user(query)
            .temperature(GENERATION_TEMPERATURE);

        if let Some(tokens) = self.max_output_tokens {
            builder = builder.max_output_tokens(tokens);
        }

        builder.build()
    }

    /// One generation call; the model's text is returned verbatim
    pub async fn generate(
        &self,
        query: &str,
        context: &RetrievedContext,
        intent: Intent,
    ) -> Result<String, DomainError> {
        let request = self.build_request(query, context, intent);

        let started = Instant::now();
        let result = self.provider.generate(request).await;

        metrics::record_upstream_call(UpstreamCallMetricParams {
            service: "generation",
            provider: self.provider.provider_name(),
            duration: started.elapsed(),
            success: result.is_ok(),
        });

        let response = result.inspect_err(|e| {
            error!(
                provider = self.provider.provider_name(),
                model = self.provider.model(),
                error = %e,
                "Generation call failed"
            );
        })?;

        debug!(
            provider = self.provider.provider_name(),
            model = %response.model,
            response_len = response.text.len(),
            "Generated response"
        );

        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::MockGenerationProvider;
    use crate::domain::{KnowledgeNode, ScoredNode};

    fn recursion_context() -> RetrievedContext {
        RetrievedContext::from_results(
            vec![ScoredNode::new(
                KnowledgeNode::new("1", "Recursion", "A function that calls itself.", vec![1.0])
                    .with_source_path("content/recursion.json"),
                0.05,
            )],
            5,
        )
    }

    fn build_generator(
        provider: MockGenerationProvider,
    ) -> (ResponseGenerator, Arc<MockGenerationProvider>) {
        let provider = Arc::new(provider);
        let generator = ResponseGenerator::new(provider.clone(), "Student Resource Hub AI");
        (generator, provider)
    }

    #[test]
    fn test_instruction_with_context() {
        let (generator, _) = build_generator(MockGenerationProvider::new("mock"));

        let instruction =
            generator.system_instruction(&recursion_context(), Intent::ConceptLearning);

        assert_eq!(
            instruction,
            "You are the Student Resource Hub AI.\nIntent: concept_learning\nContext:\n\
             [Source: content/recursion.json]\nA function that calls itself.\n\n\
             Answer the user query based strictly on context."
        );
    }

    #[test]
    fn test_instruction_without_context_has_no_context_block() {
        let (generator, _) = build_generator(MockGenerationProvider::new("mock"));

        let instruction =
            generator.system_instruction(&RetrievedContext::empty(), Intent::ProblemSolving);

        assert!(!instruction.contains("Context:"));
        assert!(instruction.contains("Intent: problem_solving"));
    }

    #[tokio::test]
    async fn test_generate_sends_ordered_parts_at_fixed_temperature() {
        let (generator, provider) =
            build_generator(MockGenerationProvider::new("mock").with_text("Recursion means..."));

        let text = generator
            .generate("What is recursion?", &recursion_context(), Intent::ConceptLearning)
            .await
            .unwrap();

        assert_eq!(text, "Recursion means...");
        let request = provider.last_request().unwrap();
        assert_eq!(request.parts.len(), 2);
        assert!(request.system_instruction().unwrap().starts_with("You are the"));
        assert_eq!(request.user_texts(), vec!["What is recursion?"]);
        assert_eq!(request.temperature, GENERATION_TEMPERATURE);
        assert_eq!(request.max_output_tokens, None);
    }

    #[tokio::test]
    async fn test_generate_failure_has_no_local_fallback() {
        let (generator, _) =
            build_generator(MockGenerationProvider::new("mock").with_error("quota"));

        let result = generator
            .generate("What is recursion?", &RetrievedContext::empty(), Intent::ConceptLearning)
            .await;

        assert!(matches!(result, Err(DomainError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_max_output_tokens() {
        let provider = Arc::new(MockGenerationProvider::new("mock"));
        let generator =
            ResponseGenerator::new(provider.clone(), "Tutor").with_max_output_tokens(Some(512));

        generator
            .generate("q", &RetrievedContext::empty(), Intent::ExploratoryQuestion)
            .await
            .unwrap();

        assert_eq!(provider.last_request().unwrap().max_output_tokens, Some(512));
    }
}
