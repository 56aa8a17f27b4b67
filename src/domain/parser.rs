use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::{
    BindingMode, DateMode, DefinitionError, FieldSpec, OptionEntry, ResolvedValue, Variant,
    dates::parse_date, normalize,
};

/// One field as written in a form document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub variant: Variant,
    #[serde(default)]
    pub options: Vec<Value>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default)]
    pub show_as_bars: bool,
    #[serde(default)]
    pub date_mode: DateMode,
    #[serde(default)]
    pub min_date: Option<String>,
    #[serde(default)]
    pub max_date: Option<String>,
    #[serde(default)]
    pub rules: Value,
    #[serde(default)]
    pub binding: Option<BindingMode>,
    #[serde(default)]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

impl FieldDefinition {
    pub fn to_spec(&self, pointer: &str) -> Result<FieldSpec, DefinitionError> {
        let min_date = self.date_bound(pointer, "minDate", self.min_date.as_deref())?;
        let max_date = self.date_bound(pointer, "maxDate", self.max_date.as_deref())?;
        if let (Some(min), Some(max)) = (min_date, max_date)
            && min > max
        {
            return Err(DefinitionError::new(
                pointer,
                "minDate must not be after maxDate",
            ));
        }
        let label = self.label.clone().unwrap_or_else(|| self.name.clone());
        let mut spec = FieldSpec::new(self.name.clone(), label, self.variant)
            .with_rules(self.rules.clone())
            .with_allow_multiple(self.allow_multiple)
            .with_show_as_bars(self.show_as_bars)
            .with_date_mode(self.date_mode)
            .with_date_bounds(min_date, max_date);
        if let Some(id) = &self.id {
            spec = spec.with_id(id.clone());
        }
        Ok(spec)
    }

    pub fn normalized_options(&self) -> Vec<OptionEntry> {
        normalize(&self.options)
    }

    pub fn default_value(&self) -> Option<ResolvedValue> {
        self.default.as_ref().and_then(ResolvedValue::from_json)
    }

    fn date_bound(
        &self,
        pointer: &str,
        key: &str,
        literal: Option<&str>,
    ) -> Result<Option<time::Date>, DefinitionError> {
        let Some(literal) = literal else {
            return Ok(None);
        };
        parse_date(literal).map(Some).ok_or_else(|| {
            DefinitionError::new(
                format!("{pointer}/{key}"),
                format!("`{literal}` is not a YYYY-MM-DD date"),
            )
        })
    }
}

pub fn parse_form_definition(value: &Value) -> Result<FormDefinition, DefinitionError> {
    let definition: FormDefinition = serde_json::from_value(value.clone())
        .map_err(|err| DefinitionError::new("", format!("invalid form definition: {err}")))?;

    let mut seen = HashSet::new();
    let mut seen_ids = HashSet::new();
    for (index, field) in definition.fields.iter().enumerate() {
        let pointer = format!("/fields/{index}");
        if field.name.trim().is_empty() {
            return Err(DefinitionError::new(pointer, "field name must not be empty"));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(DefinitionError::new(
                pointer,
                format!("duplicate field name `{}`", field.name),
            ));
        }
        let id = field.id.as_deref().unwrap_or(field.name.as_str());
        if !seen_ids.insert(id) {
            return Err(DefinitionError::new(
                format!("{pointer}/id"),
                format!("duplicate field id `{id}`"),
            ));
        }
        if field.allow_multiple && field.variant != Variant::Select {
            return Err(DefinitionError::new(
                pointer,
                format!("allowMultiple is only supported by select, not {}", field.variant),
            ));
        }
        field.to_spec(&pointer)?;
    }
    Ok(definition)
}
