//! HTTP client for the styrene chat relay backend.
//!
//! The relay exposes two endpoints: `POST /api/chat`, whose response body is
//! a plain text stream (the concatenation of all chunks, in arrival order,
//! is the full assistant reply), and `GET /api/health`, the liveness probe
//! the credential gate runs before a session starts.
//!
//! # Example
//!
//! ```ignore
//! use styrene_chat::ChatTurn;
//! use styrene_relay::RelayClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = RelayClient::new("sk-your-key");
//!     client.health().await.expect("backend not reachable");
//!
//!     let turn = ChatTurn {
//!         developer_message: "You are a helpful AI assistant.".to_string(),
//!         user_message: "Hello!".to_string(),
//!         model: "gpt-4.1-mini".to_string(),
//!     };
//!
//!     let mut stream = client.stream_chat(&turn).await.unwrap();
//!     while let Some(fragment) = stream.next_chunk().await {
//!         print!("{}", fragment.unwrap());
//!     }
//! }
//! ```

mod client;
mod decode;
mod error;
mod types;

pub use client::{ChunkStream, RelayClient};
pub use decode::Utf8Buffer;
pub use error::RelayError;
