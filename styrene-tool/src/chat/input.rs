use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use super::app::{AppMode, ChatApp};

pub fn handle_event(app: &mut ChatApp, event: Event) {
    if let Event::Key(key) = event {
        handle_key(app, key);
    }
}

fn handle_key(app: &mut ChatApp, key: KeyEvent) {
    match app.mode {
        AppMode::Gate => handle_gate_key(app, key),
        AppMode::Chat => handle_chat_key(app, key),
        AppMode::SelectModel => handle_popup_key(app, key),
        AppMode::EditPrompt => handle_prompt_key(app, key),
    }
}

fn handle_gate_key(app: &mut ChatApp, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            app.should_quit = true;
        }
        (KeyCode::Enter, _) => {
            app.submit_credential();
        }
        (KeyCode::F(2), _) => {
            app.show_key = !app.show_key;
        }
        _ => handle_edit_key(app, key),
    }
}

fn handle_chat_key(app: &mut ChatApp, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            app.should_quit = true;
        }
        (KeyCode::F(2), _) => {
            app.open_model_picker();
        }
        (KeyCode::F(3), _) => {
            app.open_prompt_editor();
        }
        (KeyCode::F(4), _) => {
            app.reset_credential();
        }
        (KeyCode::Enter, KeyModifiers::NONE) => {
            app.send_message();
        }
        (KeyCode::Up, KeyModifiers::CONTROL) => {
            app.scroll_up();
        }
        (KeyCode::Down, KeyModifiers::CONTROL) => {
            app.scroll_down();
        }
        _ => handle_edit_key(app, key),
    }
}

fn handle_prompt_key(app: &mut ChatApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt_edit(),
        KeyCode::Enter => app.apply_prompt_edit(),
        _ => handle_edit_key(app, key),
    }
}

fn handle_popup_key(app: &mut ChatApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_popup(),
        KeyCode::Enter => app.popup_select(),
        KeyCode::Up => app.popup_up(),
        KeyCode::Down => app.popup_down(),
        _ => {}
    }
}

fn handle_edit_key(app: &mut ChatApp, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Backspace, _) => {
            app.input_backspace();
        }
        (KeyCode::Delete, _) => {
            app.input_delete();
        }
        (KeyCode::Left, _) => {
            app.input_left();
        }
        (KeyCode::Right, _) => {
            app.input_right();
        }
        (KeyCode::Home, _) => {
            app.input_home();
        }
        (KeyCode::End, _) => {
            app.input_end();
        }
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            app.input_char(c);
        }
        _ => {}
    }
}
