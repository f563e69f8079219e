//! Conversation state for the styrene chat client.
//!
//! This crate models a chat session as an ordered, append-only message log
//! with at most one in-flight assistant reply. Streamed response fragments
//! are merged into the pending reply strictly in arrival order, and a session
//! epoch invalidates fragments that outlive a credential reset.
//!
//! # Example
//!
//! ```ignore
//! use styrene_chat::{ChatSession, SessionConfig, StreamEvent, StreamEventKind};
//!
//! let mut session = ChatSession::new(SessionConfig::default());
//!
//! // Begin a turn: appends the user message and a streaming placeholder.
//! let request = session.begin_turn("Hello!").unwrap();
//!
//! // Merge fragments as the transport delivers them.
//! session.apply(StreamEvent {
//!     epoch: request.epoch,
//!     kind: StreamEventKind::Chunk("Hi there".to_string()),
//! });
//! session.apply(StreamEvent {
//!     epoch: request.epoch,
//!     kind: StreamEventKind::Done,
//! });
//! ```

mod config;
mod message;
mod session;
mod turn;

pub use config::{
    AVAILABLE_MODELS, DEFAULT_DEVELOPER_PROMPT, DEFAULT_MODEL, SessionConfig, is_supported_model,
};
pub use message::{ChatMessage, MessageId, Role};
pub use session::{
    ChatSession, RESPONSE_FAILED_NOTICE, StreamEvent, StreamEventKind, TurnRequest,
};
pub use turn::ChatTurn;
