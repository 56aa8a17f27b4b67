use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::domain::{OptionItem, ResolvedValue, Variant, flatten_options};
use crate::form::{Control, ControlLayout, FormState, HitTarget};
use crate::overlay::Viewport;

/// Rows a control occupies in the body, including its error line.
pub fn control_height(control: &Control) -> u16 {
    let base = match control.spec().variant {
        Variant::Textarea => 5,
        Variant::CheckboxGroup | Variant::RadioGroup => control.group_len().max(1) as u16 + 2,
        _ => 3,
    };
    base + u16::from(control.error().is_some())
}

/// Lays out every control, scrolling so the focused one is fully visible.
/// Returns the document viewport used for overlay placement.
pub fn render_body(frame: &mut Frame<'_>, area: Rect, form: &mut FormState) -> Viewport {
    let block = Block::default().borders(Borders::ALL).title("Fields");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let screen = frame.area();
    if form.is_empty() {
        frame.render_widget(
            Paragraph::new("No fields in this form").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return Viewport::new(screen.width, screen.height);
    }

    let heights = form
        .controls()
        .iter()
        .map(control_height)
        .collect::<Vec<_>>();
    let focus = form.focus().min(heights.len() - 1);
    let focus_top: u16 = heights[..focus].iter().sum();
    let focus_bottom = focus_top + heights[focus];
    let mut offset = form.scroll_offset();
    if focus_top < offset || heights[focus] > inner.height {
        // A focused control taller than the body is pinned to its top edge.
        offset = focus_top;
    } else if focus_bottom > offset + inner.height {
        offset = focus_bottom - inner.height;
    }
    form.set_scroll_offset(offset);

    let viewport = Viewport::new(screen.width, screen.height).with_scroll(0, offset);
    let window_bottom = offset + inner.height;
    let mut top = 0u16;
    for (index, control) in form.controls_mut().iter_mut().enumerate() {
        let height = heights[index];
        // Controls scrolled partly off the top are skipped; the bottom one may be cut short.
        if top >= offset && top < window_bottom {
            let rows = height.min(window_bottom - top);
            let rect = Rect::new(inner.x, inner.y + (top - offset), inner.width, rows);
            render_control(frame, rect, height, control, index == focus, viewport);
        } else {
            control.layout = ControlLayout {
                viewport,
                ..ControlLayout::default()
            };
        }
        top += height;
    }
    viewport
}

/// `rect` is the on-screen part of the control; `full_height` is what it
/// would take uncut. The error line is only drawn when it fits.
fn render_control(
    frame: &mut Frame<'_>,
    rect: Rect,
    full_height: u16,
    control: &mut Control,
    focused: bool,
    viewport: Viewport,
) {
    let has_error = control.error().is_some();
    let field_rect = Rect {
        height: rect.height.min(full_height - u16::from(has_error)),
        ..rect
    };

    let border_color = if has_error {
        Color::Red
    } else if focused {
        Color::Yellow
    } else {
        Color::Gray
    };
    let inline_label = matches!(control.spec().variant, Variant::Checkbox | Variant::Radio);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if !inline_label && (focused || control.is_filled()) {
        block = block.title(Span::styled(
            control.spec().display_label(),
            Style::default().fg(border_color).add_modifier(Modifier::BOLD),
        ));
    }
    let inner = block.inner(field_rect);
    frame.render_widget(block, field_rect);

    let mut hits = Vec::new();
    let placeholder = Style::default().fg(Color::DarkGray);
    match control.spec().variant {
        Variant::Text | Variant::Password | Variant::Textarea => {
            render_text(frame, inner, control, focused, placeholder);
        }
        Variant::Select if control.spec().allow_multiple => {
            render_tokens(frame, inner, control, focused, placeholder, &mut hits);
        }
        Variant::Select => {
            let line = match control.selected_label() {
                Some(label) => Line::from(label),
                None => placeholder_line(control, focused, &control.palette().placeholder_select),
            };
            frame.render_widget(Paragraph::new(with_caret(line, control.is_open())), inner);
        }
        Variant::Date => {
            let mut line = match control.value().as_text().filter(|text| !text.is_empty()) {
                Some(text) => Line::from(text.to_string()),
                None => placeholder_line(control, focused, &control.palette().placeholder_date),
            };
            if let Some(badge) = control.badge() {
                line.spans.push(Span::raw("  "));
                line.spans.push(Span::styled(
                    badge,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
                ));
            }
            frame.render_widget(Paragraph::new(line), inner);
        }
        Variant::Checkbox | Variant::Radio => {
            let on = control.value().as_flag().unwrap_or(false);
            let marker = marker(control, on);
            let style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled(format!("{marker} "), style),
                Span::styled(control.spec().display_label(), style),
            ]);
            frame.render_widget(Paragraph::new(line), inner);
        }
        Variant::CheckboxGroup | Variant::RadioGroup => {
            render_group(frame, inner, control, focused, &mut hits);
        }
    }

    if let Some(error) = control.error()
        && rect.height == full_height
    {
        let line_rect = Rect::new(rect.x + 1, rect.bottom() - 1, rect.width.saturating_sub(1), 1);
        frame.render_widget(
            Paragraph::new(error.message.clone()).style(Style::default().fg(Color::Red)),
            line_rect,
        );
    }

    control.layout = ControlLayout {
        area: rect,
        trigger: field_rect,
        viewport,
        hits,
    };
}

fn placeholder_line(control: &Control, focused: bool, text: &str) -> Line<'static> {
    let text = if focused {
        text.to_string()
    } else {
        control.spec().display_label()
    };
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn with_caret(mut line: Line<'static>, open: bool) -> Line<'static> {
    line.spans
        .push(Span::styled(if open { " ▴" } else { " ▾" }, Style::default().fg(Color::DarkGray)));
    line
}

fn marker(control: &Control, on: bool) -> String {
    let palette = control.palette();
    let marker = match (control.spec().variant, on) {
        (Variant::Radio | Variant::RadioGroup, true) => &palette.radio_on,
        (Variant::Radio | Variant::RadioGroup, false) => &palette.radio_off,
        (_, true) => &palette.checked_marker,
        (_, false) => &palette.unchecked_marker,
    };
    marker.to_string()
}

fn render_text(
    frame: &mut Frame<'_>,
    inner: Rect,
    control: &Control,
    focused: bool,
    placeholder: Style,
) {
    let mut text = control.display_text();
    if control.spec().variant == Variant::Password {
        text = control
            .palette()
            .password_mask
            .to_string()
            .repeat(text.chars().count());
    }
    if text.is_empty() && !focused {
        frame.render_widget(
            Paragraph::new(Span::styled(control.spec().display_label(), placeholder)),
            inner,
        );
        return;
    }
    let lines = text.split('\n').map(str::to_string).collect::<Vec<_>>();
    let skip = lines.len().saturating_sub(inner.height.max(1) as usize);
    let shown = lines[skip..]
        .iter()
        .map(|line| Line::from(line.clone()))
        .collect::<Vec<_>>();
    let last_width = lines.last().map(|line| line.width()).unwrap_or(0) as u16;
    let last_row = (lines.len() - skip).saturating_sub(1) as u16;
    frame.render_widget(Paragraph::new(shown), inner);
    if focused && inner.width > 0 && inner.height > 0 {
        let x = inner.x + last_width.min(inner.width - 1);
        let y = inner.y + last_row.min(inner.height - 1);
        frame.set_cursor_position((x, y));
    }
}

fn render_tokens(
    frame: &mut Frame<'_>,
    inner: Rect,
    control: &Control,
    focused: bool,
    placeholder: Style,
    hits: &mut Vec<(Rect, HitTarget)>,
) {
    let tokens = control.tokens();
    if tokens.is_empty() {
        let line = placeholder_line(control, focused, &control.palette().placeholder_select);
        frame.render_widget(Paragraph::new(with_caret(line, control.is_open())), inner);
        return;
    }
    let glyph = control.palette().remove_glyph.to_string();
    let token_style = Style::default().fg(Color::Black).bg(Color::Cyan);
    let right = inner.right();
    let mut x = inner.x;
    let mut spans = Vec::new();
    for OptionItem { value, label } in tokens {
        let text = format!("[{label} {glyph}]");
        let width = text.width() as u16;
        if x + width > right {
            spans.push(Span::styled("…", placeholder));
            break;
        }
        let glyph_x = x + 1 + label.width() as u16 + 1;
        hits.push((
            Rect::new(glyph_x, inner.y, glyph.width().max(1) as u16, 1),
            HitTarget::RemoveToken(value),
        ));
        spans.push(Span::styled(text, token_style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_group(
    frame: &mut Frame<'_>,
    inner: Rect,
    control: &Control,
    focused: bool,
    hits: &mut Vec<(Rect, HitTarget)>,
) {
    let value = control.value();
    let mut lines = Vec::new();
    for (index, item) in flatten_options(control.options()).enumerate() {
        if index as u16 >= inner.height {
            break;
        }
        let on = match &value {
            ResolvedValue::List(items) => items.contains(&item.value),
            ResolvedValue::Text(text) => *text == item.value,
            ResolvedValue::Flag(_) => false,
        };
        let style = if focused && index == control.group_cursor() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{} {}", marker(control, on), item.label),
            style,
        )));
        hits.push((
            Rect::new(inner.x, inner.y + index as u16, inner.width, 1),
            HitTarget::GroupOption(index),
        ));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            control.palette().empty_options.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}
