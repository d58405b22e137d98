//! Request body for `POST /v1/chat`

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Query};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

fn default_role() -> String {
    "user".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// The last message's content is the query
    pub fn into_query(self) -> Result<Query, DomainError> {
        let last = self
            .messages
            .into_iter()
            .last()
            .ok_or_else(|| DomainError::validation("Field 'messages' must not be empty"))?;

        let content = last
            .content
            .ok_or_else(|| DomainError::validation("Last message has no content"))?;

        Query::new(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_message_is_the_query() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"messages":[
                {"role":"user","content":"Hi"},
                {"role":"assistant","content":"Hello"},
                {"role":"user","content":"What is a B-tree?"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(request.into_query().unwrap().text(), "What is a B-tree?");
    }

    #[test]
    fn test_empty_messages() {
        let request: ChatRequest = serde_json::from_str(r#"{"messages":[]}"#).unwrap();
        assert!(request.into_query().is_err());
    }

    #[test]
    fn test_missing_content() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user"}]}"#).unwrap();
        assert!(request.into_query().is_err());
    }
}
