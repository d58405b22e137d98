use serde::{Deserialize, Serialize};

/// Role of a prompt part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
}

/// One ordered part of a generation prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPart {
    pub role: PromptRole,
    pub text: String,
}

impl PromptPart {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            text: text.into(),
        }
    }
}

/// Parameters for one generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub parts: Vec<PromptPart>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::new()
    }

    /// Text of the first system part, if any
    pub fn system_instruction(&self) -> Option<&str> {
        self.parts_with_role(PromptRole::System).next()
    }

    /// Texts of the user parts, in order
    pub fn user_texts(&self) -> Vec<&str> {
        self.parts_with_role(PromptRole::User).collect()
    }

    fn parts_with_role(&self, role: PromptRole) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .filter(move |p| p.role == role)
            .map(|p| p.text.as_str())
    }
}

/// Builder for GenerationRequest
#[derive(Debug, Default)]
pub struct GenerationRequestBuilder {
    parts: Vec<PromptPart>,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl GenerationRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system(mut self, text: impl Into<String>) -> Self {
        self.parts.push(PromptPart::system(text));
        self
    }

    pub fn user(mut self, text: impl Into<String>) -> Self {
        self.parts.push(PromptPart::user(text));
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn build(self) -> GenerationRequest {
        GenerationRequest {
            parts: self.parts,
            temperature: self.temperature.unwrap_or(0.0),
            max_output_tokens: self.max_output_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_part_order() {
        let request = GenerationRequest::builder()
            .system("You are a tutor")
            .user("What is a heap?")
            .temperature(0.2)
            .build();

        assert_eq!(request.parts.len(), 2);
        assert_eq!(request.parts[0].role, PromptRole::System);
        assert_eq!(request.system_instruction(), Some("You are a tutor"));
        assert_eq!(request.user_texts(), vec!["What is a heap?"]);
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_output_tokens, None);
    }
}
