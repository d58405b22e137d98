//! Request body for `POST /v1/intent`

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{DomainError, Query};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntentRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub context: Option<Map<String, Value>>,
}

impl IntentRequest {
    /// Validated query; `query` must be present and non-blank
    pub fn into_query(self) -> Result<Query, DomainError> {
        let text = self
            .query
            .ok_or_else(|| DomainError::validation("Field 'query' is required"))?;

        Ok(Query::new(text)?.with_context(self.context.unwrap_or_default()))
    }
}
