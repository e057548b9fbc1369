//! OpenAI API integration module
//!
//! Provides API key management, HTTP client, embeddings, and streaming
//! support for the chat completions and embeddings APIs.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod streaming;

// Re-export commonly used types
pub use auth::ApiKeyManager;
pub use client::OpenAiClient;
pub use error::OpenAiError;
pub use models::{
    ChatModel, ChatRequest, EmbeddingUsage, Message, Role, StreamEvent, EMBEDDING_DIMENSION,
    EMBEDDING_MODEL,
};
