use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use styrene_chat::{AVAILABLE_MODELS, ChatMessage, Role};

use super::app::{AppMode, ChatApp};

pub fn render(frame: &mut Frame, app: &ChatApp) {
    if app.mode == AppMode::Gate {
        render_gate(frame, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Messages
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_messages(frame, app, chunks[1]);
    render_input(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    match app.mode {
        AppMode::SelectModel => render_model_popup(frame, app),
        AppMode::EditPrompt => render_prompt_popup(frame, app),
        _ => {}
    }
}

fn render_header(frame: &mut Frame, app: &ChatApp, area: Rect) {
    let title = format!(
        "sty chat - {}  [{}]",
        app.session.config().model,
        app.base_url
    );

    let header =
        Paragraph::new(title).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(header, area);
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'_>> {
    let (role, style) = match message.role {
        Role::User => ("User", Style::default().fg(Color::Green)),
        Role::Assistant => ("Assistant", Style::default().fg(Color::Blue)),
        Role::Developer => ("Developer", Style::default().fg(Color::Yellow)),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{}:", role), style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", message.created_at.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    let content_style = if message.errored {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    for (i, line) in message.content.lines().enumerate() {
        let mut spans = vec![Span::styled(format!("  {}", line), content_style)];
        if message.streaming && i == message.content.lines().count() - 1 {
            spans.push(Span::styled("▌", Style::default().fg(Color::Blue)));
        }
        lines.push(Line::from(spans));
    }

    // A reply that has not produced text yet still shows its cursor.
    if message.streaming && message.content.is_empty() {
        lines.push(Line::from(Span::styled(
            "  ▌",
            Style::default().fg(Color::Blue),
        )));
    }

    lines.push(Line::from(""));
    lines
}

fn render_messages(frame: &mut Frame, app: &ChatApp, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if app.session.messages().is_empty() {
        lines.push(Line::from(Span::styled(
            "Ready to chat! Type a message below.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for message in app.session.messages() {
        lines.extend(message_lines(message));
    }

    if let Some(ref error) = app.last_error {
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    let messages_block = Block::default().borders(Borders::ALL).title("Messages");

    // Pin the view to the bottom of the conversation, minus manual scroll
    let visible_height = area.height.saturating_sub(2) as usize;
    let total_lines = lines.len();
    let scroll = if total_lines > visible_height {
        (total_lines - visible_height).saturating_sub(app.messages_scroll as usize)
    } else {
        0
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(messages_block)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));

    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &ChatApp, area: Rect) {
    let input_block = Block::default().borders(Borders::ALL).title("Input");

    let display_text = if app.input.is_empty() {
        "Type your message...".to_string()
    } else {
        app.input.clone()
    };

    let style = if app.input.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let input_paragraph = Paragraph::new(display_text).style(style).block(input_block);

    frame.render_widget(input_paragraph, area);

    if app.mode == AppMode::Chat {
        let cursor_x = area.x + 1 + app.input[..app.cursor_pos].chars().count() as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_status_bar(frame: &mut Frame, app: &ChatApp, area: Rect) {
    let status = if app.session.is_streaming() {
        "Receiving response...  Ctrl+↑/↓: Scroll  Esc: Quit"
    } else {
        match app.mode {
            AppMode::Chat => {
                "Enter: Send  F2: Model  F3: Prompt  F4: Reset key  Ctrl+↑/↓: Scroll  Esc: Quit"
            }
            AppMode::SelectModel => "↑/↓: Navigate  Enter: Select  Esc: Cancel",
            AppMode::EditPrompt => "Enter: Apply  Esc: Cancel",
            AppMode::Gate => "",
        }
    };

    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status_bar, area);
}

fn render_gate(frame: &mut Frame, app: &ChatApp) {
    let area = centered_rect(60, 40, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default().borders(Borders::ALL).title("API Key");

    let key_display = if app.show_key {
        app.key_input.clone()
    } else {
        "•".repeat(app.key_input.chars().count())
    };

    let mut lines = vec![
        Line::from("Enter your API key to start chatting."),
        Line::from(""),
        Line::from(Span::styled(
            format!("> {}", key_display),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if app.gate_busy {
        lines.push(Line::from(Span::styled(
            "Validating...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(ref error) = app.gate_error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Keys start with \"sk-\".  Enter: Validate  F2: Show/Hide  Esc: Quit",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);

    let cursor_x = area.x + 3 + app.key_input[..app.key_cursor].chars().count() as u16;
    frame.set_cursor_position((cursor_x, area.y + 3));
}

fn render_model_popup(frame: &mut Frame, app: &ChatApp) {
    let items: Vec<ListItem> = AVAILABLE_MODELS
        .iter()
        .map(|model| {
            let current = *model == app.session.config().model;
            let style = if current {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            let marker = if current { " ✓" } else { "" };
            ListItem::new(format!("{}{}", model, marker)).style(style)
        })
        .collect();

    let area = centered_rect(40, 50, frame.area());

    frame.render_widget(Clear, area);

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Select Model"))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(app.popup_selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_prompt_popup(frame: &mut Frame, app: &ChatApp) {
    let area = centered_rect(70, 30, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Developer Prompt (applies to the next message)");

    let paragraph = Paragraph::new(app.prompt_input.as_str())
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
