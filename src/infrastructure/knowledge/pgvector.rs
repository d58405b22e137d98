//! pgvector knowledge store implementation

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::embedding::EmbeddingVector;
use crate::domain::knowledge::{DistanceMetric, KnowledgeNode, KnowledgeStore, ScoredNode};
use crate::domain::DomainError;

const NODE_COLUMNS: &str =
    "id::text AS id, title, content, source_path, created_at, embedding::text AS embedding";

/// pgvector operator ordering rows by the metric's distance
fn operator(metric: DistanceMetric) -> &'static str {
    match metric {
        DistanceMetric::Cosine => "<=>",
        DistanceMetric::Euclidean => "<->",
        DistanceMetric::DotProduct => "<#>",
    }
}

/// Knowledge store backed by PostgreSQL with the pgvector extension
pub struct PgvectorKnowledgeStore {
    pool: PgPool,
    table_name: String,
}

impl Debug for PgvectorKnowledgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgvectorKnowledgeStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PgvectorKnowledgeStore {
    /// Wrap an existing pool. The table name is interpolated into SQL, so it
    /// must be a plain (optionally schema-qualified) identifier.
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Result<Self, DomainError> {
        let table_name = table_name.into();

        if !is_valid_table_name(&table_name) {
            return Err(DomainError::configuration(format!(
                "Invalid knowledge table name: {}",
                table_name
            )));
        }

        Ok(Self { pool, table_name })
    }

    /// Connect a new pool to `database_url`
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        table_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                DomainError::knowledge_store(format!("Failed to connect to PostgreSQL: {}", e))
            })?;

        Self::new(pool, table_name)
    }

    fn row_to_node(row: &PgRow) -> Result<KnowledgeNode, DomainError> {
        let read_error =
            |e: sqlx::Error| DomainError::knowledge_store(format!("Invalid node row: {}", e));

        let id: String = row.try_get("id").map_err(read_error)?;
        let title: String = row.try_get("title").map_err(read_error)?;
        let content: String = row.try_get("content").map_err(read_error)?;
        let source_path: Option<String> = row.try_get("source_path").map_err(read_error)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read_error)?;
        let embedding: Option<String> = row.try_get("embedding").map_err(read_error)?;

        Ok(
            KnowledgeNode::new(id, title, content, embedding_values(embedding.as_deref())?)
                .with_source_path(source_path.unwrap_or_default())
                .with_created_at(created_at),
        )
    }
}

#[async_trait]
impl KnowledgeStore for PgvectorKnowledgeStore {
    fn store_type(&self) -> &'static str {
        "pgvector"
    }

    async fn nearest(
        &self,
        vector: &EmbeddingVector,
        metric: DistanceMetric,
        limit: usize,
    ) -> Result<Vec<ScoredNode>, DomainError> {
        let query = format!(
            "SELECT {}, embedding {} $1::vector AS distance FROM {} \
             WHERE embedding IS NOT NULL ORDER BY distance LIMIT $2",
            NODE_COLUMNS,
            operator(metric),
            self.table_name
        );

        let rows = sqlx::query(&query)
            .bind(embedding_to_pgvector(vector.values()))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    table = %self.table_name,
                    metric = %metric,
                    error = %e,
                    "Nearest-neighbour query failed"
                );
                DomainError::knowledge_store(format!("Search failed: {}", e))
            })?;

        rows.iter()
            .map(|row| {
                let distance: f64 = row.try_get("distance").map_err(|e| {
                    DomainError::knowledge_store(format!("Invalid distance: {}", e))
                })?;
                Ok(ScoredNode::new(Self::row_to_node(row)?, distance as f32))
            })
            .collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let query = format!("SELECT COUNT(*) AS count FROM {}", self.table_name);

        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::knowledge_store(format!("Failed to count nodes: {}", e)))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| DomainError::knowledge_store(format!("Invalid count: {}", e)))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn first(&self) -> Result<Option<KnowledgeNode>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY created_at ASC LIMIT 1",
            NODE_COLUMNS, self.table_name
        );

        let row = sqlx::query(&query)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::knowledge_store(format!("Failed to read node: {}", e)))?;

        row.as_ref().map(Self::row_to_node).transpose()
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        let result = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::knowledge_store(format!("Health check failed: {}", e)))?;

        let one: i32 = result
            .try_get(0)
            .map_err(|e| DomainError::knowledge_store(format!("Health check failed: {}", e)))?;
        Ok(one == 1)
    }
}

fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            !part.is_empty()
                && !part.starts_with(|c: char| c.is_ascii_digit())
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn embedding_to_pgvector(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(","))
}

/// A NULL embedding column reads as an empty vector
fn embedding_values(column: Option<&str>) -> Result<Vec<f32>, DomainError> {
    column.map_or_else(|| Ok(Vec::new()), parse_pgvector)
}

fn parse_pgvector(s: &str) -> Result<Vec<f32>, DomainError> {
    let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');

    if trimmed.trim().is_empty() {
        return Ok(Vec::new());
    }

    let values: Result<Vec<f32>, _> = trimmed.split(',').map(|v| v.trim().parse::<f32>()).collect();
    values.map_err(|e| DomainError::knowledge_store(format!("Failed to parse vector: {}", e)))
}
