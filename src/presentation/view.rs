use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::form::FormState;

use super::{
    body::render_body,
    footer::{render_footer, render_header},
    portal::render_portal,
};

/// Frame chrome that lives outside the form itself.
pub struct UiContext<'a> {
    pub status_message: &'a str,
    pub dirty: bool,
    pub error_count: usize,
    pub help: Option<&'a str>,
}

/// Draw one frame. Records hit regions and overlay containers on the
/// controls, so it needs the form mutably.
pub fn draw(frame: &mut Frame<'_>, form: &mut FormState, ctx: UiContext<'_>) {
    let _span = tracing::debug_span!("draw", controls = form.controls().len()).entered();
    let header_height = if form.description().is_some() { 3 } else { 2 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], form.title(), form.description());
    let viewport = render_body(frame, chunks[1], form);
    let focus_label = form.focused().map(|control| control.spec().display_label());
    render_footer(frame, chunks[2], &ctx, focus_label);
    render_portal(frame, form.controls_mut(), viewport);
}
