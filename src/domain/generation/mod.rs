//! Generative model domain models and traits

mod provider;
mod request;

pub use provider::{GenerationProvider, GenerationResponse, Usage};
pub use request::{GenerationRequest, GenerationRequestBuilder, PromptPart, PromptRole};

#[cfg(test)]
pub use provider::mock::MockGenerationProvider;
