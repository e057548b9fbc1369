//! Data models for OpenAI API requests and responses

use serde::{Deserialize, Serialize};

/// Embedding model used for all chunk and query embeddings
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Dimension of vectors produced by [`EMBEDDING_MODEL`]
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Available chat models
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChatModel {
    /// GPT-4o mini - fast and cost-effective, the workhorse for tutoring
    #[default]
    Gpt4oMini,
    /// GPT-4o - more capable, for harder material
    Gpt4o,
    /// GPT-4.1 mini
    Gpt41Mini,
}

impl ChatModel {
    /// Get the API model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4o => "gpt-4o",
            Self::Gpt41Mini => "gpt-4.1-mini",
        }
    }

    /// Get a human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gpt4oMini => "GPT-4o mini",
            Self::Gpt4o => "GPT-4o",
            Self::Gpt41Mini => "GPT-4.1 mini",
        }
    }

    /// Parse model from string (for command line)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mini" | "4o-mini" | "gpt-4o-mini" => Some(Self::Gpt4oMini),
            "4o" | "gpt-4o" => Some(Self::Gpt4o),
            "4.1-mini" | "gpt-4.1-mini" => Some(Self::Gpt41Mini),
            _ => None,
        }
    }

    /// List all available models
    pub fn all() -> &'static [ChatModel] {
        &[Self::Gpt4oMini, Self::Gpt4o, Self::Gpt41Mini]
    }
}

impl std::str::FromStr for ChatModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown model: {}. Options: mini, 4o, 4.1-mini", s))
    }
}

/// Message role in conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Message content
    pub content: String,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Response format constraint for chat completions
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    /// Format type ("json_object" forces valid JSON output)
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    /// Force the model to emit a valid JSON object
    pub fn json_object() -> Self {
        Self { format_type: "json_object".to_string() }
    }
}

/// Request body for the chat completions API
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Optional output format constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    /// Whether to stream the response
    pub stream: bool,
}

impl ChatRequest {
    /// Create a new request with default settings
    pub fn new(model: ChatModel, messages: Vec<Message>) -> Self {
        Self {
            model: model.model_id().to_string(),
            messages,
            temperature: 0.7,
            max_tokens: None,
            response_format: None,
            stream: false,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Force JSON output
    pub fn with_json_output(mut self) -> Self {
        self.response_format = Some(ResponseFormat::json_object());
        self
    }

    /// Enable streaming
    pub fn with_streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// Non-streaming response from the chat completions API
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response ID
    pub id: String,
    /// Completion choices (we always request one)
    pub choices: Vec<Choice>,
    /// Token usage statistics
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Extract the content of the first choice
    pub fn content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The generated message
    pub message: ResponseMessage,
    /// Why generation stopped
    pub finish_reason: Option<String>,
}

/// Message within a completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Text content (absent for tool calls, which we never request)
    pub content: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    /// Input tokens used
    pub prompt_tokens: u32,
    /// Output tokens generated
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// Request body for the embeddings API
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingRequest {
    /// Model identifier
    pub model: String,
    /// Text to embed
    pub input: String,
}

impl EmbeddingRequest {
    /// Create an embedding request for a single text.
    ///
    /// Newlines are replaced with spaces; the embedding endpoint performs
    /// better without them.
    pub fn new(text: &str) -> Self {
        Self { model: EMBEDDING_MODEL.to_string(), input: text.replace('\n', " ") }
    }
}

/// Response from the embeddings API
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    /// Embedding data (one entry per input)
    pub data: Vec<EmbeddingData>,
    /// Token usage statistics
    pub usage: Option<EmbeddingUsage>,
}

/// A single embedding vector
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingData {
    /// The embedding vector
    pub embedding: Vec<f32>,
}

/// Token usage for an embedding call
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EmbeddingUsage {
    /// Input tokens used
    pub prompt_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// Events received from the streaming chat API (SSE)
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Content delta - contains a text chunk
    ContentDelta {
        /// Text chunk
        text: String,
    },
    /// Generation finished
    Done,
    /// Error from API
    Error {
        /// Error message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn model_parse() {
        assert_eq!(ChatModel::parse("mini"), Some(ChatModel::Gpt4oMini));
        assert_eq!(ChatModel::parse("gpt-4o-mini"), Some(ChatModel::Gpt4oMini));
        assert_eq!(ChatModel::parse("4o"), Some(ChatModel::Gpt4o));
        assert_eq!(ChatModel::parse("GPT-4O"), Some(ChatModel::Gpt4o));
        assert_eq!(ChatModel::parse("unknown"), None);
    }

    #[test]
    fn chat_request_builder() {
        let messages = vec![Message::system("You are a tutor"), Message::user("Hello")];
        let request = ChatRequest::new(ChatModel::Gpt4oMini, messages)
            .with_temperature(0.3)
            .with_max_tokens(500)
            .with_json_output();

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, Some(500));
        assert_eq!(request.response_format.as_ref().unwrap().format_type, "json_object");
        assert!(!request.stream);
    }

    #[test]
    fn embedding_request_strips_newlines() {
        let request = EmbeddingRequest::new("line one\nline two");
        assert_eq!(request.input, "line one line two");
        assert_eq!(request.model, EMBEDDING_MODEL);
    }

    #[test]
    fn chat_response_content() {
        let json = r#"{
            "id": "chatcmpl-123",
            "choices": [{"message": {"content": "Hi there"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content(), Some("Hi there"));
        assert_eq!(response.usage.unwrap().total_tokens, 13);
    }
}
