use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
use serde_json::Value;
use time::{Date, macros::date};

use crate::{
    FormUI,
    app::UiOptions,
    form::FormState,
    presentation::{self, UiContext},
};

mod control_tests;

pub(crate) const TODAY: Date = date!(2024 - 06 - 15);

pub(crate) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub(crate) fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

pub(crate) fn type_text(form: &mut FormState, text: &str) {
    for ch in text.chars() {
        form.handle_key(&key(KeyCode::Char(ch)));
    }
}

pub(crate) fn form_from(definition: Value) -> FormState {
    FormUI::new(definition)
        .with_options(UiOptions::default().with_today(TODAY))
        .build_state()
        .expect("form builds")
}

pub(crate) fn terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).expect("test terminal")
}

/// Draw one frame and return a copy of the buffer.
pub(crate) fn render(terminal: &mut Terminal<TestBackend>, form: &mut FormState) -> Buffer {
    terminal
        .draw(|frame| {
            presentation::draw(
                frame,
                form,
                UiContext {
                    status_message: "",
                    dirty: false,
                    error_count: 0,
                    help: None,
                },
            )
        })
        .expect("frame draws");
    terminal.backend().buffer().clone()
}

pub(crate) fn row_text(buffer: &Buffer, y: u16) -> String {
    let area = buffer.area;
    (area.left()..area.right())
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

pub(crate) fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| row_text(buffer, y))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Screen cell where the first occurrence of `needle` starts.
pub(crate) fn find_text(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
    let area = buffer.area;
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        let mut starts = Vec::new();
        for x in area.left()..area.right() {
            starts.push((line.len(), x));
            line.push_str(buffer[(x, y)].symbol());
        }
        if let Some(byte) = line.find(needle) {
            let column = starts
                .iter()
                .rev()
                .find(|(start, _)| *start <= byte)
                .map(|(_, x)| *x)?;
            return Some((column, y));
        }
    }
    None
}
