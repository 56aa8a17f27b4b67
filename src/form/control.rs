use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use serde_json::Value;
use time::Date;

use crate::binding::{Binding, DirectBinding, Registration};
use crate::domain::{
    BindingMode, FieldError, FieldSpec, OptionEntry, OptionItem, ResolvedValue, ValueShape,
    Variant, find_option, flatten_options, format_date, normalize, parse_date, today,
};
use crate::overlay::{OverlaySize, OverlaySurface, PointerHub, Positioner, Viewport, rect_contains};

use super::{
    calendar::CalendarState,
    date_mode::decorate,
    palette::ControlPalette,
    selection::{filter_options, is_selected, remove, toggle},
    text::TextBuffer,
};

const CALENDAR_SIZE: OverlaySize = OverlaySize {
    width: 24,
    height: 10,
};

/// Everything a call site hands to a control.
#[derive(Debug)]
pub struct ControlProps {
    pub spec: FieldSpec,
    pub options: Vec<OptionEntry>,
    pub registration: Option<Registration>,
    pub direct: Option<DirectBinding>,
    pub error: Option<FieldError>,
}

impl ControlProps {
    pub fn new(spec: FieldSpec) -> Self {
        Self {
            spec,
            options: Vec::new(),
            registration: None,
            direct: None,
            error: None,
        }
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = OptionEntry>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    /// Options in any of the loose shapes the normalizer accepts.
    pub fn with_raw_options(mut self, options: &[Value]) -> Self {
        self.options = normalize(options);
        self
    }

    pub fn with_registration(mut self, registration: Registration) -> Self {
        self.registration = Some(registration);
        self
    }

    pub fn with_direct(mut self, direct: DirectBinding) -> Self {
        self.direct = Some(direct);
        self
    }

    pub fn with_error(mut self, error: Option<FieldError>) -> Self {
        self.error = error;
        self
    }
}

/// Something clickable recorded by the last render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Option(String),
    RemoveToken(String),
    GroupOption(usize),
    Day(Date),
    PrevMonth,
    NextMonth,
}

/// Geometry from the last frame, in screen coordinates.
#[derive(Debug, Clone, Default)]
pub struct ControlLayout {
    pub area: Rect,
    pub trigger: Rect,
    pub viewport: Viewport,
    pub hits: Vec<(Rect, HitTarget)>,
}

/// One line of an open dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownRow {
    Header(String),
    Item(OptionItem),
}

#[derive(Debug)]
pub struct Control {
    spec: FieldSpec,
    options: Vec<OptionEntry>,
    binding: Binding,
    error: Option<FieldError>,
    native: TextBuffer,
    overlay: OverlaySurface,
    search: String,
    highlight: usize,
    group_cursor: usize,
    calendar: Option<CalendarState>,
    hub: PointerHub,
    positioner: Positioner,
    palette: Arc<ControlPalette>,
    today: Date,
    pub(crate) layout: ControlLayout,
}

impl Control {
    pub fn new(props: ControlProps, hub: &PointerHub) -> Self {
        let ControlProps {
            mut spec,
            options,
            registration,
            direct,
            error,
        } = props;
        if spec.allow_multiple && spec.variant != Variant::Select {
            tracing::warn!(field = %spec.name, variant = %spec.variant, "allow_multiple ignored outside select");
            spec.allow_multiple = false;
        }
        let shape = spec.value_shape();
        let binding = Binding::resolve(spec.variant, shape, registration, direct);
        let initial = binding
            .current_value(shape)
            .as_text()
            .unwrap_or_default()
            .to_string();
        let native = TextBuffer::new(initial, spec.variant == Variant::Textarea);
        Self {
            spec,
            options,
            binding,
            error,
            native,
            overlay: OverlaySurface::new(),
            search: String::new(),
            highlight: 0,
            group_cursor: 0,
            calendar: None,
            hub: hub.clone(),
            positioner: Positioner::default(),
            palette: Arc::new(ControlPalette::default()),
            today: today(),
            layout: ControlLayout::default(),
        }
    }

    pub fn with_palette(mut self, palette: Arc<ControlPalette>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_positioner(mut self, positioner: Positioner) -> Self {
        self.positioner = positioner;
        self
    }

    /// Pin the reference date used for badges and the calendar's start month.
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    pub fn options(&self) -> &[OptionEntry] {
        &self.options
    }

    pub fn palette(&self) -> &ControlPalette {
        &self.palette
    }

    pub fn binding_mode(&self) -> BindingMode {
        self.binding.mode()
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: Option<FieldError>) {
        self.error = error;
    }

    pub fn value(&self) -> ResolvedValue {
        self.binding.current_value(self.spec.value_shape())
    }

    fn selected_values(&self) -> Vec<String> {
        self.value().into_list()
    }

    /// Text shown inside a text-entry field.
    pub fn display_text(&self) -> String {
        match self.binding.mode() {
            BindingMode::Delegated => self.native.as_str().to_string(),
            BindingMode::Direct => self.value().as_text().unwrap_or_default().to_string(),
        }
    }

    pub fn is_filled(&self) -> bool {
        if self.spec.variant.is_text_entry() {
            !self.display_text().is_empty()
        } else {
            !self.value().is_empty()
        }
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn overlay(&self) -> &OverlaySurface {
        &self.overlay
    }

    pub fn calendar(&self) -> Option<&CalendarState> {
        self.calendar.as_ref().filter(|_| self.is_open())
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn group_cursor(&self) -> usize {
        self.group_cursor
    }

    /// Click or Enter on the trigger.
    pub fn activate(&mut self) -> bool {
        match self.spec.variant {
            Variant::Select | Variant::Date => {
                if self.is_open() {
                    self.close()
                } else {
                    self.open()
                }
            }
            Variant::Checkbox => {
                let next = !self.value().as_flag().unwrap_or(false);
                self.emit(ResolvedValue::Flag(next));
                true
            }
            Variant::Radio => {
                self.emit(ResolvedValue::Flag(true));
                true
            }
            Variant::CheckboxGroup | Variant::RadioGroup => {
                self.toggle_group_option(self.group_cursor)
            }
            Variant::Text | Variant::Password | Variant::Textarea => false,
        }
    }

    pub fn open(&mut self) -> bool {
        if !self.spec.variant.has_overlay() {
            return false;
        }
        self.search.clear();
        self.highlight = self.current_highlight();
        if self.spec.variant == Variant::Date {
            self.calendar = Some(CalendarState::new(
                self.selected_date(),
                self.today,
                self.spec.min_date,
                self.spec.max_date,
            ));
        }
        let size = self.overlay_size();
        let placement = self.overlay.open(
            &self.hub,
            &self.positioner,
            self.layout.trigger,
            size,
            self.layout.viewport,
        );
        tracing::debug!(
            id = %self.spec.id,
            field = %self.spec.name,
            top = placement.top,
            left = placement.left,
            open_above = placement.open_above,
            "overlay opened"
        );
        true
    }

    /// Returns whether anything was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.overlay.close();
        self.discard_session();
        if was_open {
            tracing::debug!(id = %self.spec.id, field = %self.spec.name, "overlay closed");
        }
        was_open
    }

    /// Pick up a dismissal delivered through the pointer hub.
    pub fn sync(&mut self) -> bool {
        if self.overlay.sync() {
            self.discard_session();
            tracing::debug!(id = %self.spec.id, field = %self.spec.name, "overlay dismissed from outside");
            return true;
        }
        false
    }

    pub fn tick(&mut self) {
        self.overlay.tick();
    }

    /// Row of the current single selection, so reopening keeps it highlighted.
    fn current_highlight(&self) -> usize {
        if self.spec.variant != Variant::Select || self.spec.allow_multiple {
            return 0;
        }
        let value = self.value();
        let Some(current) = value.as_text().filter(|text| !text.is_empty()) else {
            return 0;
        };
        self.selectable_items()
            .iter()
            .position(|item| item.value == current)
            .unwrap_or(0)
    }

    fn discard_session(&mut self) {
        self.search.clear();
        self.highlight = 0;
        self.calendar = None;
    }

    fn overlay_size(&self) -> OverlaySize {
        match self.spec.variant {
            Variant::Date => CALENDAR_SIZE,
            _ => {
                let rows = self.dropdown_rows().len().max(1) as u16;
                let search = u16::from(self.spec.searchable());
                let height = rows.min(self.palette.max_dropdown_rows) + search + 2;
                let width = self.layout.trigger.width.max(self.palette.dropdown_width);
                OverlaySize::new(width, height)
            }
        }
    }

    /// Options left after the current search query.
    pub fn visible_options(&self) -> Vec<OptionEntry> {
        if self.spec.searchable() {
            filter_options(&self.search, &self.options)
        } else {
            self.options.clone()
        }
    }

    pub fn dropdown_rows(&self) -> Vec<DropdownRow> {
        let mut rows = Vec::new();
        for entry in self.visible_options() {
            match entry {
                OptionEntry::Item(item) => rows.push(DropdownRow::Item(item)),
                OptionEntry::Group(group) => {
                    rows.push(DropdownRow::Header(group.group_label));
                    rows.extend(group.items.into_iter().map(DropdownRow::Item));
                }
            }
        }
        rows
    }

    fn selectable_items(&self) -> Vec<OptionItem> {
        flatten_options(&self.visible_options()).cloned().collect()
    }

    pub fn is_option_selected(&self, value: &str) -> bool {
        match self.value() {
            ResolvedValue::List(items) => is_selected(&items, value),
            ResolvedValue::Text(text) => text == value,
            ResolvedValue::Flag(_) => false,
        }
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.highlight = 0;
    }

    pub fn push_search(&mut self, ch: char) {
        self.search.push(ch);
        self.highlight = 0;
    }

    pub fn pop_search(&mut self) -> bool {
        self.highlight = 0;
        self.search.pop().is_some()
    }

    /// Commit an option from the dropdown. Values absent from the current
    /// options are ignored.
    pub fn select_option(&mut self, value: &str) -> bool {
        if find_option(&self.options, value).is_none() {
            tracing::trace!(field = %self.spec.name, value, "ignored selection of unknown option");
            return false;
        }
        if self.spec.allow_multiple {
            let next = toggle(&self.selected_values(), value);
            self.emit(ResolvedValue::List(next));
            // The dropdown stays open for the next pick, starting from a fresh query.
            self.set_search(String::new());
        } else {
            self.emit(ResolvedValue::Text(value.to_string()));
            self.close();
        }
        true
    }

    pub fn remove_token(&mut self, value: &str) -> bool {
        if !self.spec.allow_multiple {
            return false;
        }
        let current = self.selected_values();
        let next = remove(&current, value);
        if next.len() == current.len() {
            return false;
        }
        self.emit(ResolvedValue::List(next));
        true
    }

    /// Selected values in selection order, labelled from the options when
    /// they can be matched. Stale values keep their raw value as the label.
    pub fn tokens(&self) -> Vec<OptionItem> {
        self.selected_values()
            .into_iter()
            .map(|value| match find_option(&self.options, &value) {
                Some(item) => item.clone(),
                None => OptionItem::simple(value),
            })
            .collect()
    }

    /// Label of the single selection, falling back to the raw value.
    pub fn selected_label(&self) -> Option<String> {
        let value = self.value();
        let text = value.as_text().filter(|text| !text.is_empty())?;
        Some(
            find_option(&self.options, text)
                .map(|item| item.label.clone())
                .unwrap_or_else(|| text.to_string()),
        )
    }

    /// Toggle (checkbox group) or pick (radio group) the option at `index`
    /// in declaration order.
    pub fn toggle_group_option(&mut self, index: usize) -> bool {
        let Some(item) = flatten_options(&self.options).nth(index).cloned() else {
            return false;
        };
        self.group_cursor = index;
        match self.spec.variant {
            Variant::CheckboxGroup => {
                let next = toggle(&self.selected_values(), &item.value);
                self.emit(ResolvedValue::List(next));
            }
            Variant::RadioGroup => self.emit(ResolvedValue::Text(item.value)),
            _ => return false,
        }
        true
    }

    pub fn group_len(&self) -> usize {
        flatten_options(&self.options).count()
    }

    pub fn selected_date(&self) -> Option<Date> {
        self.value().as_text().and_then(parse_date)
    }

    fn date_in_bounds(&self, date: Date) -> bool {
        self.spec.min_date.is_none_or(|min| date >= min)
            && self.spec.max_date.is_none_or(|max| date <= max)
    }

    /// Commit a day and close the calendar.
    pub fn pick_date(&mut self, date: Date) -> bool {
        if self.spec.variant != Variant::Date || !self.date_in_bounds(date) {
            return false;
        }
        self.emit(ResolvedValue::Text(format_date(date)));
        self.close();
        true
    }

    pub fn badge(&self) -> Option<String> {
        decorate(self.selected_date()?, self.spec.date_mode, self.today)
    }

    fn emit(&mut self, next: ResolvedValue) {
        tracing::trace!(id = %self.spec.id, field = %self.spec.name, value = ?next, "emit");
        self.binding.emit(&self.spec.name, next);
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.is_open() {
            return match self.spec.variant {
                Variant::Select => self.handle_dropdown_key(key),
                Variant::Date => self.handle_calendar_key(key),
                _ => false,
            };
        }
        match self.spec.variant {
            Variant::Text | Variant::Password | Variant::Textarea => self.handle_text_key(key),
            Variant::Select | Variant::Date => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
                KeyCode::Backspace | KeyCode::Delete if self.spec.allow_multiple => {
                    self.remove_last_token()
                }
                _ => false,
            },
            Variant::Checkbox | Variant::Radio => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
                _ => false,
            },
            Variant::CheckboxGroup | Variant::RadioGroup => match key.code {
                KeyCode::Up | KeyCode::Left if self.group_cursor > 0 => {
                    self.group_cursor -= 1;
                    true
                }
                KeyCode::Down | KeyCode::Right if self.group_cursor + 1 < self.group_len() => {
                    self.group_cursor += 1;
                    true
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
                _ => false,
            },
        }
    }

    fn handle_text_key(&mut self, key: &KeyEvent) -> bool {
        if self.binding.mode() == BindingMode::Direct {
            let current = self.value();
            self.native.set(current.as_text().unwrap_or_default());
        }
        if !self.native.handle_key(key) {
            return false;
        }
        let next = ResolvedValue::Text(self.native.as_str().to_string());
        self.emit(next);
        true
    }

    fn handle_dropdown_key(&mut self, key: &KeyEvent) -> bool {
        let items = self.selectable_items();
        match key.code {
            KeyCode::Esc => self.close(),
            KeyCode::Up => {
                self.highlight = self.highlight.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                if self.highlight + 1 < items.len() {
                    self.highlight += 1;
                }
                true
            }
            KeyCode::Enter => self.commit_highlight(&items),
            KeyCode::Char(' ') if !self.spec.searchable() => self.commit_highlight(&items),
            KeyCode::Char(ch)
                if self.spec.searchable()
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.push_search(ch);
                true
            }
            KeyCode::Backspace => {
                if self.pop_search() {
                    true
                } else {
                    self.remove_last_token()
                }
            }
            _ => false,
        }
    }

    fn commit_highlight(&mut self, items: &[OptionItem]) -> bool {
        match items.get(self.highlight) {
            Some(item) => {
                let value = item.value.clone();
                self.select_option(&value)
            }
            None => false,
        }
    }

    fn remove_last_token(&mut self) -> bool {
        match self.selected_values().last() {
            Some(last) => {
                let last = last.clone();
                self.remove_token(&last)
            }
            None => false,
        }
    }

    fn handle_calendar_key(&mut self, key: &KeyEvent) -> bool {
        let Some(calendar) = self.calendar.as_mut() else {
            return false;
        };
        let moved = match key.code {
            KeyCode::Esc => return self.close(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let cursor = calendar.cursor();
                return self.pick_date(cursor);
            }
            KeyCode::Left => calendar.move_cursor(-1),
            KeyCode::Right => calendar.move_cursor(1),
            KeyCode::Up => calendar.move_cursor(-7),
            KeyCode::Down => calendar.move_cursor(7),
            KeyCode::PageUp => calendar.prev_month(),
            KeyCode::PageDown => calendar.next_month(),
            _ => return false,
        };
        if !moved {
            tracing::trace!(field = %self.spec.name, "calendar move blocked by bounds");
        }
        true
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<HitTarget> {
        self.layout
            .hits
            .iter()
            .rev()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, target)| target.clone())
    }

    pub fn contains_point(&self, column: u16, row: u16) -> bool {
        rect_contains(self.layout.area, column, row) || self.overlay_contains(column, row)
    }

    pub fn overlay_contains(&self, column: u16, row: u16) -> bool {
        self.is_open()
            && self
                .overlay
                .container()
                .contains(crate::overlay::PointerDown::new(column, row))
    }

    /// Route a left click that landed on this control or its overlay.
    pub fn handle_click(&mut self, column: u16, row: u16) -> bool {
        if let Some(target) = self.hit_test(column, row) {
            return match target {
                HitTarget::Option(value) => self.select_option(&value),
                HitTarget::RemoveToken(value) => self.remove_token(&value),
                HitTarget::GroupOption(index) => self.toggle_group_option(index),
                HitTarget::Day(date) => self.pick_date(date),
                HitTarget::PrevMonth => self
                    .calendar
                    .as_mut()
                    .is_some_and(CalendarState::prev_month),
                HitTarget::NextMonth => self
                    .calendar
                    .as_mut()
                    .is_some_and(CalendarState::next_month),
            };
        }
        if rect_contains(self.layout.trigger, column, row) {
            return match self.spec.variant {
                Variant::Select | Variant::Date | Variant::Checkbox | Variant::Radio => {
                    self.activate()
                }
                _ => true,
            };
        }
        false
    }

    pub fn value_shape(&self) -> ValueShape {
        self.spec.value_shape()
    }
}
