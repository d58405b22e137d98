//! Knowledge store implementations

mod factory;
mod in_memory;
mod pgvector;

pub use factory::KnowledgeStoreFactory;
pub use in_memory::InMemoryKnowledgeStore;
pub use pgvector::PgvectorKnowledgeStore;
