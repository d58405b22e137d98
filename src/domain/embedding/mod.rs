//! Embedding provider domain models and traits

mod provider;
mod vector;

pub use provider::EmbeddingProvider;
pub use vector::{cosine_similarity, dot_product, euclidean_distance, EmbeddingVector};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
