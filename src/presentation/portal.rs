//! Floating surfaces drawn after the rest of the frame.
//!
//! Overlays are positioned against the whole screen, not the body block, so
//! nothing in the field layout clips them.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::domain::Variant;
use crate::form::{CalendarState, Control, DropdownRow, HitTarget, calendar::WEEKDAY_HEADER};
use crate::overlay::Viewport;

const DAY_CELL: u16 = 3;

pub fn render_portal(frame: &mut Frame<'_>, controls: &mut [Control], viewport: Viewport) {
    for control in controls.iter_mut().filter(|control| control.is_open()) {
        let Some(placement) = control.overlay().placement() else {
            continue;
        };
        let rect = placement.screen_rect(viewport, control.overlay().size());
        if rect.is_empty() {
            continue;
        }
        frame.render_widget(Clear, rect);

        let border = if control.overlay().is_visible() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let hits = match control.spec().variant {
            Variant::Date => match control.calendar() {
                Some(calendar) => render_calendar(frame, inner, control, calendar),
                None => Vec::new(),
            },
            _ => render_dropdown(frame, inner, control),
        };
        control
            .overlay()
            .container()
            .set_regions([control.layout.trigger, rect]);
        control.layout.hits.extend(hits);
    }
}

fn render_dropdown(frame: &mut Frame<'_>, inner: Rect, control: &Control) -> Vec<(Rect, HitTarget)> {
    let mut hits = Vec::new();
    let mut list_area = inner;
    if control.spec().searchable() && inner.height > 0 {
        let prompt = control.palette().search_prompt.to_string();
        let line = Line::from(vec![
            Span::styled(prompt.clone(), Style::default().fg(Color::DarkGray)),
            Span::raw(control.search().to_string()),
        ]);
        let search_rect = Rect { height: 1, ..inner };
        frame.render_widget(Paragraph::new(line), search_rect);
        let cursor_x = inner.x + (prompt.chars().count() + control.search().chars().count()) as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
        list_area = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
    }

    let rows = control.dropdown_rows();
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(control.palette().empty_options.to_string())
                .style(Style::default().fg(Color::DarkGray)),
            list_area,
        );
        return hits;
    }

    let highlighted_row = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| matches!(row, DropdownRow::Item(_)))
        .nth(control.highlight())
        .map(|(index, _)| index)
        .unwrap_or(0);
    let height = list_area.height as usize;
    let start = if height == 0 {
        0
    } else {
        highlighted_row.saturating_sub(height - 1)
    };

    let multi = control.spec().allow_multiple;
    let palette = control.palette();
    let mut lines = Vec::new();
    for (offset, (index, row)) in rows.iter().enumerate().skip(start).take(height).enumerate() {
        let y = list_area.y + offset as u16;
        match row {
            DropdownRow::Header(label) => lines.push(Line::from(Span::styled(
                label.clone(),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ))),
            DropdownRow::Item(item) => {
                let selected = control.is_option_selected(&item.value);
                let prefix = if multi {
                    if selected {
                        palette.checked_marker.to_string()
                    } else {
                        palette.unchecked_marker.to_string()
                    }
                } else if selected {
                    "•".to_string()
                } else {
                    " ".to_string()
                };
                let style = if index == highlighted_row {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!(" {prefix} {}", item.label),
                    style,
                )));
                hits.push((
                    Rect::new(list_area.x, y, list_area.width, 1),
                    HitTarget::Option(item.value.clone()),
                ));
            }
        }
    }
    frame.render_widget(Paragraph::new(lines), list_area);
    hits
}

fn render_calendar(
    frame: &mut Frame<'_>,
    inner: Rect,
    control: &Control,
    calendar: &CalendarState,
) -> Vec<(Rect, HitTarget)> {
    let mut hits = Vec::new();
    if inner.height < 2 || inner.width < DAY_CELL * 7 {
        return hits;
    }
    let nav = |enabled: bool| {
        if enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let label = calendar.month_label();
    let padding = (inner.width as usize)
        .saturating_sub(label.chars().count() + 2)
        / 2;
    let header = Line::from(vec![
        Span::styled("‹", nav(calendar.can_go_prev())),
        Span::raw(" ".repeat(padding)),
        Span::styled(label.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(
            (inner.width as usize).saturating_sub(label.chars().count() + 2 + padding),
        )),
        Span::styled("›", nav(calendar.can_go_next())),
    ]);
    hits.push((Rect::new(inner.x, inner.y, 1, 1), HitTarget::PrevMonth));
    hits.push((Rect::new(inner.right() - 1, inner.y, 1, 1), HitTarget::NextMonth));

    let mut lines = vec![
        header,
        Line::from(Span::styled(
            WEEKDAY_HEADER
                .iter()
                .map(|day| format!("{day} "))
                .collect::<String>(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let selected = control.selected_date();
    for (week_index, week) in calendar.weeks().iter().enumerate() {
        let y = inner.y + 2 + week_index as u16;
        if y >= inner.bottom() {
            break;
        }
        let mut spans = Vec::with_capacity(7);
        for (column, cell) in week.iter().enumerate() {
            let Some(date) = cell else {
                spans.push(Span::raw("   "));
                continue;
            };
            let selectable = calendar.is_selectable(*date);
            let mut style = Style::default();
            if !selectable {
                style = style.fg(Color::DarkGray);
            } else if Some(*date) == selected {
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            if *date == calendar.cursor() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("{:>2}", date.day()), style));
            spans.push(Span::raw(" "));
            if selectable {
                hits.push((
                    Rect::new(inner.x + column as u16 * DAY_CELL, y, 2, 1),
                    HitTarget::Day(*date),
                ));
            }
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), inner);
    hits
}
