use chrono::{DateTime, Local};

/// Opaque message identity, strictly increasing within a session.
pub type MessageId = u64;

/// Author of a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    Developer,
}

/// One entry in the transcript.
///
/// Content is append-only while `streaming` is true and frozen once the
/// reply reaches a terminal state. `errored` is set only when the transport
/// failed; `streaming` and `errored` are never both true.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Local>,
    pub streaming: bool,
    pub errored: bool,
}

impl ChatMessage {
    /// Creates a completed message with the given content.
    pub fn new(id: MessageId, role: Role, content: String) -> Self {
        Self {
            id,
            role,
            content,
            created_at: Local::now(),
            streaming: false,
            errored: false,
        }
    }

    /// Creates the empty assistant placeholder that a streamed reply fills.
    pub fn pending(id: MessageId) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: String::new(),
            created_at: Local::now(),
            streaming: true,
            errored: false,
        }
    }
}
