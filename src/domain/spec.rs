use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use super::value::ValueShape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    Text,
    Password,
    Textarea,
    Select,
    Date,
    Checkbox,
    Radio,
    CheckboxGroup,
    RadioGroup,
}

impl Variant {
    pub const ALL: [Variant; 9] = [
        Variant::Text,
        Variant::Password,
        Variant::Textarea,
        Variant::Select,
        Variant::Date,
        Variant::Checkbox,
        Variant::Radio,
        Variant::CheckboxGroup,
        Variant::RadioGroup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Text => "text",
            Variant::Password => "password",
            Variant::Textarea => "textarea",
            Variant::Select => "select",
            Variant::Date => "date",
            Variant::Checkbox => "checkbox",
            Variant::Radio => "radio",
            Variant::CheckboxGroup => "checkbox-group",
            Variant::RadioGroup => "radio-group",
        }
    }

    /// Variants whose trigger opens a floating dropdown or calendar.
    pub fn has_overlay(self) -> bool {
        matches!(self, Variant::Select | Variant::Date)
    }

    pub fn is_text_entry(self) -> bool {
        matches!(self, Variant::Text | Variant::Password | Variant::Textarea)
    }

    pub fn is_group(self) -> bool {
        matches!(self, Variant::CheckboxGroup | Variant::RadioGroup)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| format!("unknown control variant `{s}`"))
    }
}

/// Semantic meaning of a date field, used to pick a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    #[default]
    #[serde(alias = "default")]
    None,
    Birth,
    Expiry,
}

impl FromStr for DateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" | "default" => Ok(DateMode::None),
            "birth" => Ok(DateMode::Birth),
            "expiry" => Ok(DateMode::Expiry),
            other => Err(format!("unknown date mode `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    /// The form store owns the value; the control only forwards native changes.
    Delegated,
    /// The caller supplies the value and receives every change.
    Direct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub id: String,
    pub name: String,
    pub label: String,
    pub variant: Variant,
    /// Opaque to the control; interpreted by the form store.
    pub rules: Value,
    pub allow_multiple: bool,
    pub show_as_bars: bool,
    pub date_mode: DateMode,
    pub min_date: Option<Date>,
    pub max_date: Option<Date>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, variant: Variant) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            label: label.into(),
            variant,
            rules: Value::Null,
            allow_multiple: false,
            show_as_bars: false,
            date_mode: DateMode::None,
            min_date: None,
            max_date: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_rules(mut self, rules: Value) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    pub fn with_show_as_bars(mut self, bars: bool) -> Self {
        self.show_as_bars = bars;
        self
    }

    pub fn with_date_mode(mut self, mode: DateMode) -> Self {
        self.date_mode = mode;
        self
    }

    pub fn with_date_bounds(mut self, min: Option<Date>, max: Option<Date>) -> Self {
        self.min_date = min;
        self.max_date = max;
        self
    }

    pub fn value_shape(&self) -> ValueShape {
        if self.allow_multiple || self.variant == Variant::CheckboxGroup {
            return ValueShape::List;
        }
        match self.variant {
            Variant::Checkbox | Variant::Radio => ValueShape::Flag,
            _ => ValueShape::Text,
        }
    }

    /// Selects with a search box: multi-select and the "bars" presentation.
    pub fn searchable(&self) -> bool {
        self.variant == Variant::Select && (self.allow_multiple || self.show_as_bars)
    }

    pub fn is_required(&self) -> bool {
        match self.rules.get("required") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(_)) => true,
            _ => false,
        }
    }

    pub fn display_label(&self) -> String {
        if self.is_required() {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }
}
