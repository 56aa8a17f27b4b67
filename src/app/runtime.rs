use anyhow::{Result, anyhow};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use serde_json::Value;

use crate::{
    form::FormState,
    presentation::{self, UiContext},
};

use super::{
    input::{KeyCommand, classify},
    options::UiOptions,
    status::{Status, StatusLine},
    terminal::TerminalGuard,
};

const HELP_TEXT: &str = "Tab/Shift+Tab move • Enter/Space open or toggle • Esc close • click outside dismisses • Ctrl+S save • Ctrl+Q quit";

pub(crate) struct App {
    form: FormState,
    options: UiOptions,
    status: StatusLine,
    error_count: usize,
    exit_armed: bool,
    should_quit: bool,
    result: Option<Value>,
}

impl App {
    pub fn new(form: FormState, options: UiOptions) -> Self {
        Self {
            form,
            options,
            status: StatusLine::new(),
            error_count: 0,
            exit_armed: false,
            should_quit: false,
            result: None,
        }
    }

    pub fn run(&mut self) -> Result<Value> {
        let mut terminal = TerminalGuard::enter(self.options.mouse_capture)?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            // Overlays mounted during the frame above become visible on the next one.
            self.form.tick();
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
        }

        self.result
            .take()
            .ok_or_else(|| anyhow!("user exited without saving"))
    }

    pub(crate) fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let help = self.options.show_help.then_some(HELP_TEXT);
        let dirty = self.form.is_dirty();
        presentation::draw(
            frame,
            &mut self.form,
            UiContext {
                status_message: self.status.message(),
                dirty,
                error_count: self.error_count,
                help,
            },
        );
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match classify(&key, self.form.any_open()) {
            KeyCommand::Save => {
                self.exit_armed = false;
                self.on_save();
            }
            KeyCommand::Quit => self.on_exit(),
            KeyCommand::NextField => {
                self.exit_armed = false;
                self.form.focus_next();
            }
            KeyCommand::PrevField => {
                self.exit_armed = false;
                self.form.focus_prev();
            }
            KeyCommand::CloseOverlay => {
                self.form.close_focused();
                self.after_interaction();
            }
            KeyCommand::ResetStatus => {
                self.exit_armed = false;
                self.status.set(Status::Ready);
            }
            KeyCommand::Edit(key) => self.on_edit(key),
        }
    }

    fn on_edit(&mut self, key: KeyEvent) {
        if self.form.handle_key(&key) {
            self.exit_armed = false;
            self.after_interaction();
            return;
        }
        match key.code {
            KeyCode::Down => self.form.focus_next(),
            KeyCode::Up => self.form.focus_prev(),
            _ => {}
        }
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(button) => {
                let click = button == MouseButton::Left;
                let (column, row) = (mouse.column, mouse.row);
                let open_label = self
                    .form
                    .open_control()
                    .map(|control| control.spec().display_label());
                let lands_on_field = click && self.form.control_at(column, row).is_some();
                if !self.form.dispatch_pointer(column, row, click) {
                    return;
                }
                self.exit_armed = false;
                match open_label {
                    Some(label) if !lands_on_field && !self.form.any_open() => {
                        self.status.set(Status::Dismissed(label));
                    }
                    _ => self.after_interaction(),
                }
            }
            MouseEventKind::ScrollDown if !self.form.any_open() => self.form.focus_next(),
            MouseEventKind::ScrollUp if !self.form.any_open() => self.form.focus_prev(),
            _ => {}
        }
    }

    fn after_interaction(&mut self) {
        let Some(control) = self.form.focused() else {
            return;
        };
        let label = control.spec().display_label();
        self.status
            .focused(control.spec().variant, &label, control.is_open());
        self.error_count = self
            .form
            .controls()
            .iter()
            .filter(|control| control.error().is_some())
            .count();
    }

    fn on_save(&mut self) {
        self.form.close_focused();
        let issues = self.form.validate();
        self.error_count = issues;
        if issues > 0 {
            self.status.set(Status::Issues(issues));
            return;
        }
        self.status.set(Status::Saved);
        self.result = Some(self.form.values());
        self.should_quit = true;
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.form.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status.set(Status::PendingExit);
            return;
        }
        self.should_quit = true;
        self.result = None;
    }

    #[cfg(test)]
    pub(crate) fn form_for_test(&mut self) -> &mut FormState {
        &mut self.form
    }

    #[cfg(test)]
    pub(crate) fn status_for_test(&self) -> &str {
        self.status.message()
    }

    #[cfg(test)]
    pub(crate) fn outcome_for_test(&self) -> (bool, Option<&Value>) {
        (self.should_quit, self.result.as_ref())
    }
}
