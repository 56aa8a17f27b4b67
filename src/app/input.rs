use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Save,
    Quit,
    NextField,
    PrevField,
    CloseOverlay,
    ResetStatus,
    Edit(KeyEvent),
}

pub fn classify(key: &KeyEvent, overlay_open: bool) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => return KeyCommand::Save,
            KeyCode::Char('q') | KeyCode::Char('Q') => return KeyCommand::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => return KeyCommand::Quit,
            _ => {}
        }
    }

    match key.code {
        KeyCode::Tab => KeyCommand::NextField,
        KeyCode::BackTab => KeyCommand::PrevField,
        KeyCode::Esc if overlay_open => KeyCommand::CloseOverlay,
        KeyCode::Esc => KeyCommand::ResetStatus,
        _ => KeyCommand::Edit(*key),
    }
}
