use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::view::UiContext;

pub fn render_header(frame: &mut Frame<'_>, area: Rect, title: &str, description: Option<&str>) {
    let mut lines = vec![Line::from(Span::styled(
        if title.is_empty() { "Form" } else { title }.to_string(),
        Style::default().fg(Color::Cyan),
    ))];
    if let Some(description) = description {
        lines.push(Line::from(Span::styled(
            description.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>, focus_label: Option<String>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let actions = fit_line(
        &format!("Actions: {}", ctx.help.unwrap_or(" ")),
        area.width as usize,
    );
    frame.render_widget(
        Paragraph::new(actions).style(Style::default().fg(Color::Yellow)),
        rows[0],
    );

    let mut status = ctx.status_message.to_string();
    if ctx.dirty {
        status.push_str(" • unsaved changes");
    }
    if let Some(label) = focus_label {
        status.push_str(" • focus: ");
        status.push_str(&label);
    }
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }
    let badge = if ctx.error_count > 0 {
        Span::styled(
            format!("[! {}]", ctx.error_count),
            Style::default().fg(Color::Red),
        )
    } else {
        Span::styled("[ok]", Style::default().fg(Color::Green))
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Status: "),
            Span::raw(status),
            Span::raw(" "),
            badge,
        ])),
        rows[1],
    );
}

/// Cut `text` at a word boundary so it fits one row, marking the cut.
fn fit_line(text: &str, width: usize) -> String {
    if width < 2 {
        return String::new();
    }
    let lines = textwrap::wrap(text, width - 1);
    match lines.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, ..] => format!("{first}…"),
    }
}

#[cfg(test)]
mod tests {
    use super::fit_line;

    #[test]
    fn long_help_is_cut_on_a_word_boundary() {
        assert_eq!(fit_line("Tab move • Esc close", 40), "Tab move • Esc close");
        assert_eq!(fit_line("Tab move • Esc close", 12), "Tab move •…");
    }
}
