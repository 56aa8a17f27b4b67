use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Native input buffer for the text-entry variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    multiline: bool,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>, multiline: bool) -> Self {
        Self {
            text: text.into(),
            multiline,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Returns true when the buffer changed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(ch) => {
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    return false;
                }
                self.text.push(ch);
                true
            }
            KeyCode::Enter if self.multiline => {
                self.text.push('\n');
                true
            }
            KeyCode::Backspace => self.text.pop().is_some(),
            KeyCode::Delete => {
                let changed = !self.text.is_empty();
                self.text.clear();
                changed
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn edits_and_ignores_control_chords() {
        let mut buffer = TextBuffer::default();
        assert!(buffer.handle_key(&key(KeyCode::Char('h'))));
        assert!(buffer.handle_key(&key(KeyCode::Char('i'))));
        assert!(!buffer.handle_key(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(buffer.handle_key(&key(KeyCode::Backspace)));
        assert_eq!(buffer.as_str(), "h");
        assert!(buffer.handle_key(&key(KeyCode::Delete)));
        assert!(!buffer.handle_key(&key(KeyCode::Backspace)));
    }

    #[test]
    fn enter_only_breaks_lines_when_multiline() {
        let mut single = TextBuffer::new("a", false);
        assert!(!single.handle_key(&key(KeyCode::Enter)));
        let mut multi = TextBuffer::new("a", true);
        assert!(multi.handle_key(&key(KeyCode::Enter)));
        multi.handle_key(&key(KeyCode::Char('b')));
        assert_eq!(multi.lines().collect::<Vec<_>>(), ["a", "b"]);
    }
}
