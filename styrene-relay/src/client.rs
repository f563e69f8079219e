use styrene_chat::ChatTurn;
use tracing::{debug, instrument};

use crate::decode::Utf8Buffer;
use crate::error::RelayError;
use crate::types::ChatRequestBody;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Client for the chat relay backend.
pub struct RelayClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl RelayClient {
    /// Creates a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Creates a new client with a custom base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Opens a streaming completion for one turn.
    ///
    /// A non-success status is an error before any chunk is read; otherwise
    /// the returned stream yields decoded text fragments in arrival order.
    #[instrument(skip(self, turn), fields(model = %turn.model))]
    pub async fn stream_chat(&self, turn: &ChatTurn) -> Result<ChunkStream, RelayError> {
        let body = ChatRequestBody::new(turn, &self.api_key);

        debug!("Opening chat stream");

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(RelayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Chat stream open");

        Ok(ChunkStream {
            response,
            utf8: Utf8Buffer::new(),
            done: false,
        })
    }

    /// Liveness probe used by the credential gate before a session starts.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<(), RelayError> {
        let response = self
            .http
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Api {
                status: status.as_u16(),
                message: "health probe failed".to_string(),
            });
        }

        debug!("Health probe succeeded");
        Ok(())
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let Ok(body) = response.json::<serde_json::Value>().await else {
        return "Unknown error".to_string();
    };
    body.get("detail")
        .and_then(|d| d.as_str())
        .or_else(|| {
            body.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
        })
        .unwrap_or("Unknown error")
        .to_string()
}

/// A streaming response body, consumed one chunk at a time.
///
/// Single consumer, strictly sequential: each `next_chunk` call is the one
/// suspension point per chunk read, and fragments come out in the exact
/// order the transport delivered them.
pub struct ChunkStream {
    response: reqwest::Response,
    utf8: Utf8Buffer,
    done: bool,
}

impl ChunkStream {
    /// Reads the next decoded text fragment.
    ///
    /// Returns `None` on clean end of stream. Any error is terminal: the
    /// stream yields nothing after it.
    pub async fn next_chunk(&mut self) -> Option<Result<String, RelayError>> {
        if self.done {
            return None;
        }

        loop {
            match self.response.chunk().await {
                Ok(Some(bytes)) => match self.utf8.push(&bytes) {
                    // An empty fragment means the chunk only carried part of
                    // a code point; keep reading.
                    Ok(text) if text.is_empty() => continue,
                    Ok(text) => return Some(Ok(text)),
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                Ok(None) => {
                    self.done = true;
                    return match self.utf8.finish() {
                        Ok(()) => None,
                        Err(e) => Some(Err(e)),
                    };
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(RelayError::Http(e)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RelayClient::new("sk-test-key");
        assert_eq!(client.api_key, "sk-test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_custom_base_url() {
        let client = RelayClient::with_base_url("sk-test-key", "http://relay.example.com");
        assert_eq!(client.base_url, "http://relay.example.com");
    }

    #[tokio::test]
    #[ignore = "requires a running relay backend and STYRENE_API_KEY env var"]
    async fn test_live_stream() {
        let api_key = std::env::var("STYRENE_API_KEY").expect("STYRENE_API_KEY not set");
        let client = RelayClient::new(api_key);

        client.health().await.expect("backend not reachable");

        let turn = ChatTurn {
            developer_message: "You are a helpful AI assistant.".to_string(),
            user_message: "Say 'hello' and nothing else.".to_string(),
            model: "gpt-4.1-mini".to_string(),
        };

        let mut stream = client.stream_chat(&turn).await.expect("request failed");
        let mut reply = String::new();
        while let Some(fragment) = stream.next_chunk().await {
            reply.push_str(&fragment.expect("stream error"));
        }

        assert!(!reply.is_empty());
    }
}
