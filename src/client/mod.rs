//! Backend client for `POST /chat`.
//!
//! [`ChatBackend`] is the seam the dispatch loop talks to. [`HttpChatClient`]
//! is the reqwest implementation; tests substitute scripted backends.

use async_trait::async_trait;
use thiserror::Error;

use crate::messaging::{ChatRequest, ChatResponse, ErrorBody};

/// Errors that prevent a reply from being produced at all.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request task died before it could report back.
    #[error("{0}")]
    Transport(String),
}

/// Outcome of a completed HTTP round-trip.
#[derive(Debug, Clone)]
pub enum BackendReply {
    Success(ChatResponse),
    Failure {
        status: u16,
        reason: String,
        /// `None` when the body was not valid JSON.
        body: Option<ErrorBody>,
    },
}

/// Something that can answer a chat message.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, message: &str) -> Result<BackendReply, ClientError>;
}

/// HTTP backend talking to `{endpoint}/chat`.
pub struct HttpChatClient {
    client: reqwest::Client,
    chat_url: String,
}

impl HttpChatClient {
    pub fn new(endpoint: &str) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            chat_url: format!("{}/chat", endpoint.trim_end_matches('/')),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn send(&self, message: &str) -> Result<BackendReply, ClientError> {
        tracing::debug!("POST {}", self.chat_url);

        let response = self
            .client
            .post(&self.chat_url)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            let body = match response.bytes().await {
                Ok(bytes) => serde_json::from_slice(&bytes).ok().map(ErrorBody::from_value),
                Err(e) => {
                    tracing::debug!("Failed to read error body: {}", e);
                    None
                }
            };
            tracing::warn!("Chat backend returned {}", status);
            return Ok(BackendReply::Failure {
                status: status.as_u16(),
                reason,
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)?;
        tracing::debug!(
            "Chat backend returned {} event(s)",
            parsed.events.as_ref().map_or(0, Vec::len)
        );
        Ok(BackendReply::Success(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::ChatEvent;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_chat_url_strips_trailing_slash() {
        assert_eq!(
            HttpChatClient::new("http://localhost:8000/").chat_url(),
            "http://localhost:8000/chat"
        );
        assert_eq!(
            HttpChatClient::new("http://localhost:8000").chat_url(),
            "http://localhost:8000/chat"
        );
    }

    #[tokio::test]
    async fn test_success_posts_json_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "List all my orders"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "You have 2 orders.",
                "agent_name": "list_orders_agent",
                "events": [
                    {"type": "final_response", "text": "You have 2 orders.", "agent_name": "list_orders_agent"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpChatClient::new(&server.uri());
        let reply = client.send("List all my orders").await.unwrap();

        let BackendReply::Success(response) = reply else {
            panic!("expected success, got {:?}", reply);
        };
        assert_eq!(
            response.events(),
            vec![ChatEvent::final_response(
                "You have 2 orders.",
                Some("list_orders_agent")
            )]
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "bad input"})))
            .mount(&server)
            .await;

        let reply = HttpChatClient::new(&server.uri()).send("x").await.unwrap();

        match reply {
            BackendReply::Failure {
                status,
                reason,
                body,
            } => {
                assert_eq!(status, 400);
                assert_eq!(reason, "Bad Request");
                assert_eq!(body.and_then(|b| b.detail), Some(json!("bad input")));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_with_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let reply = HttpChatClient::new(&server.uri()).send("x").await.unwrap();

        assert!(matches!(
            reply,
            BackendReply::Failure {
                status: 502,
                body: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_success_with_invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = HttpChatClient::new(&server.uri()).send("x").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpChatClient::new(&format!("http://{}", addr))
            .send("x")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
