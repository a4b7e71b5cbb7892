// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Chat-completion client for the LLM inference engine.
//!
//! [`EngineClient`] talks to any OpenAI-compatible `/chat/completions`
//! endpoint; the default deployment target is a local Ollama instance. One
//! generation call is one non-streaming request with a fixed model
//! identifier. There is no retry and no caching: repeated identical prompts
//! produce independent generations, since sampling behavior belongs to the
//! engine.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::{DocEngine, GeneratedDocument};

/// Default request timeout in seconds.
///
/// Local models can be slow on first load, so this is generous. The handler
/// adds no timeout of its own on top.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// OpenAI-compatible chat-completion client.
pub struct EngineClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl EngineClient {
    /// Create a client from engine settings.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| EngineError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request body for one prompt.
    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        }
    }

    /// Map a non-2xx engine response to an error variant.
    fn handle_error_response(&self, status_code: u16, body: &str) -> EngineError {
        if let Ok(error) = serde_json::from_str::<ApiError>(body) {
            let message = error.error.message;
            match error.error.error_type.as_deref() {
                Some("authentication_error") | Some("invalid_api_key") => {
                    EngineError::AuthError(message)
                }
                Some("model_not_found") => EngineError::ModelNotFound(message),
                _ => EngineError::api(message, status_code),
            }
        } else if status_code == 404 {
            // Ollama answers a missing model with a plain 404.
            EngineError::ModelNotFound(self.model.clone())
        } else {
            EngineError::api(body.to_string(), status_code)
        }
    }
}

#[async_trait]
impl DocEngine for EngineClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedDocument, EngineError> {
        let request = self.build_request(prompt);

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending chat request");

        let mut req = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("content-type", "application/json");

        if let Some(ref api_key) = self.api_key {
            req = req.header("authorization", format!("Bearer {}", api_key));
        }

        let response = req
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.handle_error_response(status.as_u16(), &error_text));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| EngineError::ParseError(e.to_string()))?;

        // An empty reply body is a valid generation per the engine's own
        // contract; only a reply with no choices at all is malformed.
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::ParseError("response contained no choices".to_string()))?;

        Ok(GeneratedDocument::new(choice.message.content))
    }
}

// ============================================================================
// API Types
// ============================================================================

/// Request body for the Chat Completions API.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

/// Chat message format.
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Chat completion response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// A choice in the response.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// API error response.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine_config(base_url: &str) -> EngineConfig {
        EngineConfig {
            base_url: base_url.to_string(),
            model: "llama3.2".to_string(),
            api_key: None,
        }
    }

    #[test]
    fn test_build_request_fixed_model() {
        let client = EngineClient::new(&engine_config("http://localhost:11434/v1")).unwrap();
        let request = client.build_request("hello");
        assert_eq!(request.model, "llama3.2");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert!(!request.stream);
    }

    #[test]
    fn test_handle_error_response_auth() {
        let client = EngineClient::new(&engine_config("http://localhost:11434/v1")).unwrap();
        let body = r#"{"error":{"message":"bad key","type":"invalid_api_key"}}"#;
        assert!(matches!(
            client.handle_error_response(401, body),
            EngineError::AuthError(_)
        ));
    }

    #[test]
    fn test_handle_error_response_missing_model() {
        let client = EngineClient::new(&engine_config("http://localhost:11434/v1")).unwrap();
        assert!(matches!(
            client.handle_error_response(404, "model 'llama9' not found"),
            EngineError::ModelNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_generate_returns_reply_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"model": "llama3.2", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "## Summary\nAll good."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = EngineClient::new(&engine_config(&server.uri())).unwrap();
        let doc = client.generate("analyze these logs").await.unwrap();
        assert_eq!(doc.body, "## Summary\nAll good.");
    }

    #[tokio::test]
    async fn test_generate_empty_reply_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": ""}}]
            })))
            .mount(&server)
            .await;

        let client = EngineClient::new(&engine_config(&server.uri())).unwrap();
        let doc = client.generate("analyze").await.unwrap();
        assert_eq!(doc.body, "");
    }

    #[tokio::test]
    async fn test_generate_no_choices_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = EngineClient::new(&engine_config(&server.uri())).unwrap();
        let err = client.generate("analyze").await.unwrap_err();
        assert!(matches!(err, EngineError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_generate_server_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("engine on fire"))
            .mount(&server)
            .await;

        let client = EngineClient::new(&engine_config(&server.uri())).unwrap();
        let err = client.generate("analyze").await.unwrap_err();
        match err {
            EngineError::ApiError { status_code, .. } => assert_eq!(status_code, Some(500)),
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_sends_bearer_token_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "ok"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = EngineConfig {
            base_url: server.uri(),
            model: "llama3.2".to_string(),
            api_key: Some("test-key".to_string()),
        };
        let client = EngineClient::new(&config).unwrap();
        assert!(client.generate("analyze").await.is_ok());
    }
}
