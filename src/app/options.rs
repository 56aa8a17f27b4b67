use std::{borrow::Cow, sync::Arc, time::Duration};

use time::Date;

use crate::form::ControlPalette;
use crate::overlay::Positioner;

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub confirm_exit: bool,
    pub show_help: bool,
    /// Rows between a trigger and its overlay.
    pub overlay_gap: u16,
    pub clamp_overlays: bool,
    /// Report mouse events; without it overlays close only from the keyboard.
    pub mouse_capture: bool,
    /// Reference date for badges and the calendar; `None` means the current UTC date.
    pub today: Option<Date>,
    pub(crate) palette: Arc<ControlPalette>,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            confirm_exit: true,
            show_help: true,
            overlay_gap: 0,
            clamp_overlays: false,
            mouse_capture: true,
            today: None,
            palette: Arc::new(ControlPalette::default()),
        }
    }
}

impl UiOptions {
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_overlay_gap(mut self, gap: u16) -> Self {
        self.overlay_gap = gap;
        self
    }

    pub fn with_overlay_clamp(mut self, clamp: bool) -> Self {
        self.clamp_overlays = clamp;
        self
    }

    pub fn with_mouse_capture(mut self, capture: bool) -> Self {
        self.mouse_capture = capture;
        self
    }

    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_palette(mut self, palette: ControlPalette) -> Self {
        self.palette = Arc::new(palette);
        self
    }

    pub fn with_max_dropdown_rows(self, rows: u16) -> Self {
        self.map_palette(|palette| palette.with_max_dropdown_rows(rows))
    }

    pub fn with_remove_glyph(self, glyph: impl Into<Cow<'static, str>>) -> Self {
        let glyph = glyph.into();
        self.map_palette(|palette| palette.with_remove_glyph(glyph))
    }

    pub fn with_password_mask(self, mask: char) -> Self {
        self.map_palette(|palette| palette.with_password_mask(mask))
    }

    pub fn palette(&self) -> Arc<ControlPalette> {
        Arc::clone(&self.palette)
    }

    pub fn positioner(&self) -> Positioner {
        Positioner::new(self.overlay_gap).with_horizontal_clamp(self.clamp_overlays)
    }

    pub fn today(&self) -> Date {
        self.today.unwrap_or_else(crate::domain::today)
    }

    fn map_palette(mut self, map: impl FnOnce(ControlPalette) -> ControlPalette) -> Self {
        let updated = map((*self.palette).clone());
        self.palette = Arc::new(updated);
        self
    }
}
