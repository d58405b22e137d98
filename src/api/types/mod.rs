//! Request and error types of the HTTP surface

pub mod chat;
pub mod error;
pub mod intent;
pub mod json;

pub use chat::{ChatMessage, ChatRequest};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use intent::IntentRequest;
pub use json::Json;
