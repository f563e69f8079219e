use std::sync::Arc;

use styrene_chat::{
    AVAILABLE_MODELS, ChatSession, SessionConfig, StreamEvent, StreamEventKind, TurnRequest,
};
use styrene_relay::RelayClient;
use tokio::sync::{mpsc, oneshot};

use crate::config::{ChatOptions, validate_api_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Credential gate; no session exists until it accepts.
    Gate,
    Chat,
    SelectModel,
    EditPrompt,
}

pub struct ChatApp {
    pub mode: AppMode,
    pub should_quit: bool,
    pub base_url: String,
    pub session: ChatSession,
    pub client: Option<Arc<RelayClient>>,

    // Credential gate state
    pub key_input: String,
    pub key_cursor: usize,
    pub show_key: bool,
    pub gate_busy: bool,
    pub gate_error: Option<String>,
    gate_rx: Option<oneshot::Receiver<Result<RelayClient, String>>>,

    // Chat input state
    pub input: String,
    pub cursor_pos: usize,
    pub messages_scroll: u16,
    pub last_error: Option<String>,
    stream_rx: Option<mpsc::UnboundedReceiver<StreamEvent>>,

    // Developer prompt editor state
    pub prompt_input: String,
    pub prompt_cursor: usize,

    // Popup state
    pub popup_selected: usize,
}

impl ChatApp {
    pub fn new(options: ChatOptions) -> Self {
        let key_input = options.api_key.unwrap_or_default();
        let key_cursor = key_input.len();

        Self {
            mode: AppMode::Gate,
            should_quit: false,
            base_url: options.base_url,
            session: ChatSession::new(SessionConfig {
                developer_prompt: options.developer_prompt,
                model: options.model,
            }),
            client: None,
            key_input,
            key_cursor,
            show_key: false,
            gate_busy: false,
            gate_error: None,
            gate_rx: None,
            input: String::new(),
            cursor_pos: 0,
            messages_scroll: 0,
            last_error: None,
            stream_rx: None,
            prompt_input: String::new(),
            prompt_cursor: 0,
            popup_selected: 0,
        }
    }

    // Credential gate

    /// Validates the entered key and, if it is well-formed, probes the
    /// backend before letting the session start.
    pub fn submit_credential(&mut self) {
        if self.gate_busy {
            return;
        }

        let key = self.key_input.trim().to_string();
        if let Err(e) = validate_api_key(&key) {
            self.gate_error = Some(e.to_string());
            return;
        }

        let base_url = self.base_url.clone();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let client = RelayClient::with_base_url(key, base_url);
            let result = match client.health().await {
                Ok(()) => Ok(client),
                Err(e) => Err(format!("Backend not reachable: {}", e)),
            };
            let _ = tx.send(result);
        });

        self.gate_rx = Some(rx);
        self.gate_busy = true;
        self.gate_error = None;
    }

    pub fn poll_gate(&mut self) {
        let Some(ref mut rx) = self.gate_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(client)) => {
                self.client = Some(Arc::new(client));
                self.gate_rx = None;
                self.gate_busy = false;
                self.key_input.clear();
                self.key_cursor = 0;
                self.mode = AppMode::Chat;
            }
            Ok(Err(message)) => {
                self.gate_error = Some(message);
                self.gate_rx = None;
                self.gate_busy = false;
            }
            Err(oneshot::error::TryRecvError::Empty) => {
                // Still probing
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                self.gate_error = Some("Validation cancelled".to_string());
                self.gate_rx = None;
                self.gate_busy = false;
            }
        }
    }

    /// Destroys the credential along with the whole session: log, config and
    /// any in-flight stream. Chunks from the old epoch are dead on arrival.
    pub fn reset_credential(&mut self) {
        self.client = None;
        self.stream_rx = None;
        self.session.reset();
        self.input.clear();
        self.cursor_pos = 0;
        self.messages_scroll = 0;
        self.last_error = None;
        self.mode = AppMode::Gate;
    }

    // Streaming

    pub fn send_message(&mut self) {
        let Some(client) = self.client.clone() else {
            return;
        };
        // The session refuses empty input and a second in-flight turn; the
        // input buffer is left intact in that case.
        let Some(request) = self.session.begin_turn(&self.input) else {
            return;
        };

        self.input.clear();
        self.cursor_pos = 0;
        self.messages_scroll = 0;
        self.last_error = None;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(pump_stream(client, request, tx));
        self.stream_rx = Some(rx);
    }

    pub fn poll_stream(&mut self) {
        loop {
            let Some(ref mut rx) = self.stream_rx else {
                return;
            };
            match rx.try_recv() {
                Ok(event) => {
                    let terminal = !matches!(event.kind, StreamEventKind::Chunk(_));
                    if let StreamEventKind::Failed(ref reason) = event.kind {
                        self.last_error = Some(reason.clone());
                    }
                    self.session.apply(event);
                    if terminal {
                        self.stream_rx = None;
                    }
                }
                Err(mpsc::error::TryRecvError::Empty) => return,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    // The pump died without a terminal event; fail the reply
                    // rather than leave it streaming forever.
                    let epoch = self.session.epoch();
                    self.session.apply(StreamEvent {
                        epoch,
                        kind: StreamEventKind::Failed("stream closed unexpectedly".to_string()),
                    });
                    self.stream_rx = None;
                }
            }
        }
    }

    // Model picker

    pub fn open_model_picker(&mut self) {
        self.popup_selected = AVAILABLE_MODELS
            .iter()
            .position(|&m| m == self.session.config().model)
            .unwrap_or(0);
        self.mode = AppMode::SelectModel;
    }

    pub fn close_popup(&mut self) {
        self.mode = AppMode::Chat;
    }

    pub fn popup_up(&mut self) {
        if self.popup_selected > 0 {
            self.popup_selected -= 1;
        }
    }

    pub fn popup_down(&mut self) {
        if self.popup_selected < AVAILABLE_MODELS.len() - 1 {
            self.popup_selected += 1;
        }
    }

    pub fn popup_select(&mut self) {
        if self.mode == AppMode::SelectModel {
            self.session.set_model(AVAILABLE_MODELS[self.popup_selected]);
        }
        self.close_popup();
    }

    // Developer prompt editor

    pub fn open_prompt_editor(&mut self) {
        self.prompt_input = self.session.config().developer_prompt.clone();
        self.prompt_cursor = self.prompt_input.len();
        self.mode = AppMode::EditPrompt;
    }

    /// Takes effect on the next turn, not on a reply already streaming.
    pub fn apply_prompt_edit(&mut self) {
        let prompt = self.prompt_input.clone();
        self.session.set_developer_prompt(prompt);
        self.mode = AppMode::Chat;
    }

    pub fn cancel_prompt_edit(&mut self) {
        self.mode = AppMode::Chat;
    }

    // Scrolling

    pub fn scroll_up(&mut self) {
        self.messages_scroll = self.messages_scroll.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.messages_scroll = self.messages_scroll.saturating_sub(1);
    }

    // Text editing, shared by the gate, chat and prompt fields

    fn active_field(&mut self) -> (&mut String, &mut usize) {
        match self.mode {
            AppMode::Gate => (&mut self.key_input, &mut self.key_cursor),
            AppMode::EditPrompt => (&mut self.prompt_input, &mut self.prompt_cursor),
            _ => (&mut self.input, &mut self.cursor_pos),
        }
    }

    pub fn input_char(&mut self, c: char) {
        let (buf, pos) = self.active_field();
        buf.insert(*pos, c);
        *pos += c.len_utf8();
    }

    pub fn input_backspace(&mut self) {
        let (buf, pos) = self.active_field();
        if *pos > 0 {
            let prev_char_boundary = buf[..*pos]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            buf.remove(prev_char_boundary);
            *pos = prev_char_boundary;
        }
    }

    pub fn input_delete(&mut self) {
        let (buf, pos) = self.active_field();
        if *pos < buf.len() {
            buf.remove(*pos);
        }
    }

    pub fn input_left(&mut self) {
        let (buf, pos) = self.active_field();
        if *pos > 0 {
            *pos = buf[..*pos]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn input_right(&mut self) {
        let (buf, pos) = self.active_field();
        if *pos < buf.len() {
            *pos = buf[*pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| *pos + i)
                .unwrap_or(buf.len());
        }
    }

    pub fn input_home(&mut self) {
        let (_, pos) = self.active_field();
        *pos = 0;
    }

    pub fn input_end(&mut self) {
        let (buf, pos) = self.active_field();
        *pos = buf.len();
    }
}

/// Forwards one response stream into the session's event channel.
///
/// Every event carries the epoch the turn started under; a session reset
/// drops the receiver, so sends from an abandoned stream simply fail.
async fn pump_stream(
    client: Arc<RelayClient>,
    request: TurnRequest,
    tx: mpsc::UnboundedSender<StreamEvent>,
) {
    let TurnRequest { epoch, turn } = request;

    let mut stream = match client.stream_chat(&turn).await {
        Ok(stream) => stream,
        Err(e) => {
            let _ = tx.send(StreamEvent {
                epoch,
                kind: StreamEventKind::Failed(e.to_string()),
            });
            return;
        }
    };

    loop {
        match stream.next_chunk().await {
            Some(Ok(text)) => {
                if tx
                    .send(StreamEvent {
                        epoch,
                        kind: StreamEventKind::Chunk(text),
                    })
                    .is_err()
                {
                    // Receiver dropped: the session was reset.
                    return;
                }
            }
            Some(Err(e)) => {
                let _ = tx.send(StreamEvent {
                    epoch,
                    kind: StreamEventKind::Failed(e.to_string()),
                });
                return;
            }
            None => {
                let _ = tx.send(StreamEvent {
                    epoch,
                    kind: StreamEventKind::Done,
                });
                return;
            }
        }
    }
}
