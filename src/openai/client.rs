//! HTTP client for the OpenAI API

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::error::OpenAiError;
use super::models::{
    ChatRequest, ChatResponse, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage, StreamEvent,
};
use super::streaming;

/// OpenAI API client
pub struct OpenAiClient {
    /// HTTP client
    client: Client,
    /// API key for authentication
    api_key: String,
}

impl OpenAiClient {
    /// Chat completions endpoint
    const CHAT_URL: &'static str = "https://api.openai.com/v1/chat/completions";
    /// Embeddings endpoint
    const EMBEDDINGS_URL: &'static str = "https://api.openai.com/v1/embeddings";

    /// Create a new OpenAI client with the given API key
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, api_key }
    }

    /// Send a non-streaming chat completion request
    pub async fn chat(&self, mut request: ChatRequest) -> Result<ChatResponse, OpenAiError> {
        // Disable streaming for this request
        request.stream = false;

        let response = self
            .client
            .post(Self::CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&body)?;
        Ok(chat_response)
    }

    /// Send a chat completion request and return the response text
    pub async fn chat_text(&self, request: ChatRequest) -> Result<String, OpenAiError> {
        let response = self.chat(request).await?;
        response.content().map(str::to_string).ok_or(OpenAiError::EmptyResponse)
    }

    /// Send a JSON-mode chat request and parse the reply into `T`
    ///
    /// The request should have been built with `with_json_output()`. A reply
    /// that is not valid JSON of the expected shape surfaces the raw payload
    /// in the error so prompt problems can be diagnosed.
    pub async fn chat_json<T: DeserializeOwned>(
        &self,
        request: ChatRequest,
    ) -> Result<T, OpenAiError> {
        let content = self.chat_text(request).await?;
        serde_json::from_str(&content).map_err(|e| OpenAiError::MalformedResponse {
            reason: e.to_string(),
            payload: content,
        })
    }

    /// Send a streaming chat completion request
    ///
    /// Spawns the HTTP call and streams content deltas through the channel.
    /// Use the cancellation token to interrupt the request.
    pub async fn chat_streaming(
        &self,
        mut request: ChatRequest,
        tx: mpsc::Sender<StreamEvent>,
        cancel_token: CancellationToken,
    ) -> Result<(), OpenAiError> {
        request.stream = true;

        let response = self
            .client
            .post(Self::CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        // Process the streaming response
        streaming::process_stream(response, tx, cancel_token).await
    }

    /// Create an embedding vector for a single text
    pub async fn embed(&self, text: &str) -> Result<(Vec<f32>, EmbeddingUsage), OpenAiError> {
        let request = EmbeddingRequest::new(text);

        let response = self
            .client
            .post(Self::EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        let embedding_response: EmbeddingResponse = serde_json::from_str(&body)?;

        let usage = embedding_response.usage.unwrap_or_default();
        let embedding = embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(OpenAiError::EmptyResponse)?;

        Ok((embedding, usage))
    }

    /// Test the API key by embedding a trivial input
    pub async fn test_connection(&self) -> Result<(), OpenAiError> {
        self.embed("ping").await?;
        Ok(())
    }

    /// Map HTTP errors to typed errors, passing successful responses through
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OpenAiError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(OpenAiError::RateLimited { retry_after_seconds: retry_after });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(OpenAiError::ApiError {
                status: 401,
                message: "Invalid API key".to_string(),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OpenAiError::ApiError { status: status.as_u16(), message });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = OpenAiClient::new("sk-test-key".to_string());
        assert_eq!(client.api_key, "sk-test-key");
    }
}
