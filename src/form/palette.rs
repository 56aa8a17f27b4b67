use std::borrow::Cow;

/// User-facing strings and sizing shared by every control.
#[derive(Debug, Clone)]
pub struct ControlPalette {
    pub placeholder_select: Cow<'static, str>,
    pub placeholder_date: Cow<'static, str>,
    pub search_prompt: Cow<'static, str>,
    pub empty_options: Cow<'static, str>,
    pub remove_glyph: Cow<'static, str>,
    pub password_mask: char,
    pub checked_marker: Cow<'static, str>,
    pub unchecked_marker: Cow<'static, str>,
    pub radio_on: Cow<'static, str>,
    pub radio_off: Cow<'static, str>,
    pub max_dropdown_rows: u16,
    pub dropdown_width: u16,
}

impl ControlPalette {
    pub fn with_placeholders(
        mut self,
        select: impl Into<Cow<'static, str>>,
        date: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.placeholder_select = select.into();
        self.placeholder_date = date.into();
        self
    }

    pub fn with_search_prompt(mut self, prompt: impl Into<Cow<'static, str>>) -> Self {
        self.search_prompt = prompt.into();
        self
    }

    pub fn with_empty_options(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.empty_options = text.into();
        self
    }

    pub fn with_remove_glyph(mut self, glyph: impl Into<Cow<'static, str>>) -> Self {
        self.remove_glyph = glyph.into();
        self
    }

    pub fn with_password_mask(mut self, mask: char) -> Self {
        self.password_mask = mask;
        self
    }

    pub fn with_max_dropdown_rows(mut self, rows: u16) -> Self {
        self.max_dropdown_rows = rows.max(1);
        self
    }

    pub fn with_dropdown_width(mut self, width: u16) -> Self {
        self.dropdown_width = width.max(8);
        self
    }
}

impl Default for ControlPalette {
    fn default() -> Self {
        Self {
            placeholder_select: Cow::Borrowed("Select…"),
            placeholder_date: Cow::Borrowed("Pick a date"),
            search_prompt: Cow::Borrowed("Search: "),
            empty_options: Cow::Borrowed("No options"),
            remove_glyph: Cow::Borrowed("×"),
            password_mask: '•',
            checked_marker: Cow::Borrowed("[x]"),
            unchecked_marker: Cow::Borrowed("[ ]"),
            radio_on: Cow::Borrowed("(•)"),
            radio_off: Cow::Borrowed("( )"),
            max_dropdown_rows: 8,
            dropdown_width: 32,
        }
    }
}
