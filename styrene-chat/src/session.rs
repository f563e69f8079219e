use crate::config::SessionConfig;
use crate::message::{ChatMessage, MessageId, Role};
use crate::turn::ChatTurn;

/// Transcript text shown in place of a reply that failed mid-flight.
pub const RESPONSE_FAILED_NOTICE: &str =
    "Sorry, there was an error processing your request. Please try again.";

/// One increment of a streamed reply, stamped with the epoch it was minted
/// under. Events from a previous epoch are dropped on arrival.
#[derive(Debug, Clone)]
pub struct StreamEvent {
    pub epoch: u64,
    pub kind: StreamEventKind,
}

#[derive(Debug, Clone)]
pub enum StreamEventKind {
    /// A decoded text fragment, appended verbatim to the pending reply.
    Chunk(String),
    /// Clean end of stream.
    Done,
    /// Transport or decode failure; the payload is the underlying reason.
    Failed(String),
}

/// Snapshot handed to the transport when a turn begins.
///
/// The developer prompt and model are captured at submission time, so later
/// config edits only affect subsequent turns.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub epoch: u64,
    pub turn: ChatTurn,
}

/// Ordered message log plus the single in-flight assistant reply.
///
/// Invariants:
/// - the log is append-only; no reordering, no deletion
/// - at most one message has `streaming == true` at any instant
/// - a reply transitions exactly once, to completed or to failed
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    config: SessionConfig,
    epoch: u64,
    next_id: MessageId,
    pending: Option<MessageId>,
}

impl ChatSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            messages: Vec::new(),
            config,
            epoch: 0,
            next_id: 0,
            pending: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether an assistant reply is still being streamed.
    pub fn is_streaming(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies to the next turn only; an in-flight reply is unaffected.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.config.model = model.into();
    }

    /// Applies to the next turn only; an in-flight reply is unaffected.
    pub fn set_developer_prompt(&mut self, prompt: impl Into<String>) {
        self.config.developer_prompt = prompt.into();
    }

    /// Starts a new exchange.
    ///
    /// Appends the trimmed user message and an empty assistant placeholder
    /// with `streaming = true`, and returns the request to send. Returns
    /// `None` without touching the log when the trimmed text is empty or a
    /// reply is already in flight.
    pub fn begin_turn(&mut self, text: &str) -> Option<TurnRequest> {
        let text = text.trim();
        if text.is_empty() || self.pending.is_some() {
            return None;
        }

        let user_id = self.alloc_id();
        self.messages
            .push(ChatMessage::new(user_id, Role::User, text.to_string()));

        let reply_id = self.alloc_id();
        self.messages.push(ChatMessage::pending(reply_id));
        self.pending = Some(reply_id);

        Some(TurnRequest {
            epoch: self.epoch,
            turn: ChatTurn {
                developer_message: self.config.developer_prompt.clone(),
                user_message: text.to_string(),
                model: self.config.model.clone(),
            },
        })
    }

    /// Merges one stream event into the pending reply.
    ///
    /// Events from a stale epoch, or arriving after the reply reached a
    /// terminal state, are dropped.
    pub fn apply(&mut self, event: StreamEvent) {
        if event.epoch != self.epoch {
            return;
        }
        let Some(id) = self.pending else {
            return;
        };
        let Some(reply) = self.messages.iter_mut().find(|m| m.id == id) else {
            return;
        };

        match event.kind {
            StreamEventKind::Chunk(text) => {
                reply.content.push_str(&text);
            }
            StreamEventKind::Done => {
                reply.streaming = false;
                self.pending = None;
            }
            StreamEventKind::Failed(_) => {
                // Partial content is discarded, not preserved: a half answer
                // with no terminal marker reads as a complete one.
                reply.content = RESPONSE_FAILED_NOTICE.to_string();
                reply.streaming = false;
                reply.errored = true;
                self.pending = None;
            }
        }
    }

    /// Clears the log and config and advances the epoch, so that fragments
    /// from any request still in flight can no longer mutate the transcript.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.config = SessionConfig::default();
        self.pending = None;
        self.epoch += 1;
    }

    fn alloc_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(epoch: u64, text: &str) -> StreamEvent {
        StreamEvent {
            epoch,
            kind: StreamEventKind::Chunk(text.to_string()),
        }
    }

    fn done(epoch: u64) -> StreamEvent {
        StreamEvent {
            epoch,
            kind: StreamEventKind::Done,
        }
    }

    fn failed(epoch: u64) -> StreamEvent {
        StreamEvent {
            epoch,
            kind: StreamEventKind::Failed("connection reset".to_string()),
        }
    }

    #[test]
    fn begin_turn_appends_user_then_placeholder() {
        let mut session = ChatSession::default();
        let request = session.begin_turn("  Hello!  ").expect("turn should start");

        assert_eq!(session.messages().len(), 2);
        let user = &session.messages()[0];
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "Hello!");
        assert!(!user.streaming);

        let reply = &session.messages()[1];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "");
        assert!(reply.streaming);
        assert!(!reply.errored);

        assert!(user.id < reply.id);
        assert_eq!(request.turn.user_message, "Hello!");
    }

    #[test]
    fn whitespace_only_input_is_rejected() {
        let mut session = ChatSession::default();
        assert!(session.begin_turn("   \n\t ").is_none());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn second_submit_while_streaming_is_a_no_op() {
        let mut session = ChatSession::default();
        session.begin_turn("first").expect("turn should start");
        assert!(session.begin_turn("second").is_none());
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn chunks_concatenate_in_arrival_order() {
        let mut session = ChatSession::default();
        let request = session.begin_turn("hi").expect("turn should start");

        for text in ["Hel", "lo, ", "world"] {
            session.apply(chunk(request.epoch, text));
        }
        session.apply(done(request.epoch));

        let reply = &session.messages()[1];
        assert_eq!(reply.content, "Hello, world");
        assert!(!reply.streaming);
        assert!(!reply.errored);
    }

    #[test]
    fn failure_replaces_partial_content_with_notice() {
        let mut session = ChatSession::default();
        let request = session.begin_turn("hi").expect("turn should start");

        session.apply(chunk(request.epoch, "partial answ"));
        session.apply(failed(request.epoch));

        let reply = &session.messages()[1];
        assert_eq!(reply.content, RESPONSE_FAILED_NOTICE);
        assert!(!reply.streaming);
        assert!(reply.errored);
    }

    #[test]
    fn failure_before_any_chunk_uses_notice() {
        let mut session = ChatSession::default();
        let request = session.begin_turn("hi").expect("turn should start");

        session.apply(failed(request.epoch));

        assert_eq!(session.messages()[1].content, RESPONSE_FAILED_NOTICE);
    }

    #[test]
    fn at_most_one_streaming_message_across_turns() {
        let mut session = ChatSession::default();
        let first = session.begin_turn("one").expect("turn should start");
        session.apply(chunk(first.epoch, "a"));
        session.apply(done(first.epoch));

        session.begin_turn("two").expect("turn should start");

        let streaming = session.messages().iter().filter(|m| m.streaming).count();
        assert_eq!(streaming, 1);
    }

    #[test]
    fn events_after_terminal_state_are_dropped() {
        let mut session = ChatSession::default();
        let request = session.begin_turn("hi").expect("turn should start");

        session.apply(chunk(request.epoch, "answer"));
        session.apply(done(request.epoch));
        session.apply(chunk(request.epoch, " more"));

        assert_eq!(session.messages()[1].content, "answer");
    }

    #[test]
    fn reset_clears_log_and_config() {
        let mut session = ChatSession::new(SessionConfig {
            developer_prompt: "Be terse.".to_string(),
            model: "gpt-4".to_string(),
        });
        session.begin_turn("hi").expect("turn should start");

        session.reset();

        assert!(session.messages().is_empty());
        assert_eq!(*session.config(), SessionConfig::default());
        assert!(!session.is_streaming());
    }

    #[test]
    fn stale_epoch_events_cannot_resurrect_messages() {
        let mut session = ChatSession::default();
        let request = session.begin_turn("hi").expect("turn should start");

        session.reset();
        session.apply(chunk(request.epoch, "late"));
        session.apply(done(request.epoch));

        assert!(session.messages().is_empty());

        // A post-reset turn is unaffected by leftovers from the old stream.
        let fresh = session.begin_turn("again").expect("turn should start");
        session.apply(chunk(request.epoch, "stale"));
        session.apply(chunk(fresh.epoch, "fresh"));

        assert_eq!(session.messages()[1].content, "fresh");
    }

    #[test]
    fn turn_request_snapshots_config_at_submission() {
        let mut session = ChatSession::default();
        session.set_developer_prompt("Answer in French.");
        session.set_model("gpt-4");

        let request = session.begin_turn("bonjour").expect("turn should start");
        assert_eq!(request.turn.developer_message, "Answer in French.");
        assert_eq!(request.turn.model, "gpt-4");

        // Edits while streaming only affect the next turn.
        session.set_developer_prompt("Answer in German.");
        session.apply(done(request.epoch));

        let next = session.begin_turn("hallo").expect("turn should start");
        assert_eq!(next.turn.developer_message, "Answer in German.");
    }
}
