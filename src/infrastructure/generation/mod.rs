//! Generative model provider implementations

mod factory;
mod gemini;
mod openai;

pub use factory::GenerationProviderFactory;
pub use gemini::GeminiGenerationProvider;
pub use openai::OpenAiGenerationProvider;

pub use super::http_client::{HttpClient, HttpClientTrait};
