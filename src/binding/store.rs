//! Reference implementation of the external form-state collaborator.
//!
//! Controls treat it opaquely: `register` hands out a [`Registration`] that
//! native inputs push their changes through, `watch` reads a value and
//! `set_value` writes one. Rules are a JSON Schema fragment applied to the
//! field value, plus two extra keys: `required` (bool or custom message) and
//! `message` (overrides the schema error text).

use std::{cell::RefCell, fmt, rc::Rc};

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use jsonschema::{Validator, validator_for};
use serde_json::{Map, Value};

use crate::domain::{FieldError, ResolvedValue};

const REQUIRED_MESSAGE: &str = "This field is required";

/// Change raised by an input attached through a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeChange {
    pub name: String,
    pub value: ResolvedValue,
}

impl NativeChange {
    pub fn new(name: impl Into<String>, value: ResolvedValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Clone, Default)]
pub struct FormStore {
    inner: Rc<RefCell<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    fields: IndexMap<String, StoredField>,
}

#[derive(Default)]
struct StoredField {
    value: Option<ResolvedValue>,
    required: Option<String>,
    message: Option<String>,
    validator: Option<Validator>,
    error: Option<FieldError>,
    dirty: bool,
}

#[derive(Default)]
struct CompiledRules {
    required: Option<String>,
    message: Option<String>,
    validator: Option<Validator>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str, rules: &Value) -> Result<Registration> {
        let compiled =
            compile_rules(rules).with_context(|| format!("invalid rules for field `{name}`"))?;
        let mut state = self.inner.borrow_mut();
        let field = state.fields.entry(name.to_string()).or_default();
        field.required = compiled.required;
        field.message = compiled.message;
        field.validator = compiled.validator;
        Ok(Registration {
            name: name.to_string(),
            store: self.clone(),
        })
    }

    pub fn watch(&self, name: &str) -> Option<ResolvedValue> {
        self.inner
            .borrow()
            .fields
            .get(name)
            .and_then(|field| field.value.clone())
    }

    /// Write a value. A field already showing an error is re-validated so the
    /// message clears as soon as the input becomes valid.
    pub fn set_value(&self, name: &str, value: ResolvedValue) {
        let mut state = self.inner.borrow_mut();
        let field = state.fields.entry(name.to_string()).or_default();
        field.value = Some(value);
        field.dirty = true;
        if field.error.is_some() {
            let error = check_field(field);
            field.error = error;
        }
    }

    /// Write an initial value without marking the form dirty.
    pub fn seed(&self, name: &str, value: ResolvedValue) {
        let mut state = self.inner.borrow_mut();
        state.fields.entry(name.to_string()).or_default().value = Some(value);
    }

    pub fn error(&self, name: &str) -> Option<FieldError> {
        self.inner
            .borrow()
            .fields
            .get(name)
            .and_then(|field| field.error.clone())
    }

    pub fn set_error(&self, name: &str, error: Option<FieldError>) {
        let mut state = self.inner.borrow_mut();
        state.fields.entry(name.to_string()).or_default().error = error;
    }

    pub fn clear_errors(&self) {
        let mut state = self.inner.borrow_mut();
        for field in state.fields.values_mut() {
            field.error = None;
        }
    }

    /// Validate every registered field, returning the number of invalid ones.
    pub fn validate(&self) -> usize {
        let mut state = self.inner.borrow_mut();
        let mut issues = 0usize;
        for (name, field) in state.fields.iter_mut() {
            let error = check_field(field);
            if let Some(error) = &error {
                issues += 1;
                tracing::debug!(field = %name, message = %error.message, "field invalid");
            }
            field.error = error;
        }
        issues
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.borrow().fields.values().any(|field| field.dirty)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.inner.borrow().fields.keys().cloned().collect()
    }

    /// Every field value in registration order; unset fields are `null`.
    pub fn values(&self) -> Value {
        let state = self.inner.borrow();
        let map = state
            .fields
            .iter()
            .map(|(name, field)| {
                let value = field
                    .value
                    .as_ref()
                    .map(ResolvedValue::to_json)
                    .unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect::<Map<_, _>>();
        Value::Object(map)
    }
}

impl fmt::Debug for FormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormStore")
            .field("fields", &self.field_names())
            .finish()
    }
}

/// Binding handed out by [`FormStore::register`].
#[derive(Clone)]
pub struct Registration {
    name: String,
    store: FormStore,
}

impl Registration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<ResolvedValue> {
        self.store.watch(&self.name)
    }

    pub fn on_native_change(&self, change: &NativeChange) {
        self.store.set_value(&change.name, change.value.clone());
    }

    pub fn error(&self) -> Option<FieldError> {
        self.store.error(&self.name)
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn compile_rules(rules: &Value) -> Result<CompiledRules> {
    let map = match rules {
        Value::Null => return Ok(CompiledRules::default()),
        Value::Object(map) => map,
        other => bail!("rules must be an object, found {other}"),
    };
    let mut schema = map.clone();
    let message = match schema.remove("message") {
        Some(Value::String(message)) => Some(message),
        _ => None,
    };
    let required = match schema.remove("required") {
        Some(Value::Bool(true)) => Some(REQUIRED_MESSAGE.to_string()),
        Some(Value::String(message)) => Some(message),
        _ => None,
    };
    let validator = if schema.is_empty() {
        None
    } else {
        Some(validator_for(&Value::Object(schema)).context("failed to compile field rules")?)
    };
    Ok(CompiledRules {
        required,
        message,
        validator,
    })
}

fn check_field(field: &StoredField) -> Option<FieldError> {
    let value = field.value.as_ref().filter(|value| !value.is_empty());
    let Some(value) = value else {
        return field.required.clone().map(FieldError::new);
    };
    let validator = field.validator.as_ref()?;
    let instance = value.to_json();
    validator.iter_errors(&instance).next().map(|error| {
        let message = field
            .message
            .clone()
            .unwrap_or_else(|| error.to_string());
        FieldError::new(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_fields_fail_when_empty() {
        let store = FormStore::new();
        store.register("name", &json!({"required": true})).unwrap();
        assert_eq!(store.validate(), 1);
        assert_eq!(store.error("name").unwrap().message, REQUIRED_MESSAGE);

        store.set_value("name", ResolvedValue::from("Ada"));
        assert!(store.error("name").is_none(), "revalidated on change");
        assert_eq!(store.validate(), 0);
    }

    #[test]
    fn schema_rules_use_custom_message() {
        let store = FormStore::new();
        store
            .register(
                "code",
                &json!({"minLength": 3, "message": "Use at least three characters"}),
            )
            .unwrap();
        store.set_value("code", ResolvedValue::from("ab"));
        assert_eq!(store.validate(), 1);
        assert_eq!(
            store.error("code").unwrap().message,
            "Use at least three characters"
        );
    }

    #[test]
    fn optional_empty_values_skip_schema_checks() {
        let store = FormStore::new();
        store.register("code", &json!({"minLength": 3})).unwrap();
        store.seed("code", ResolvedValue::from(""));
        assert_eq!(store.validate(), 0);
        assert!(!store.is_dirty());
    }

    #[test]
    fn rejects_non_object_rules() {
        let store = FormStore::new();
        assert!(store.register("x", &json!(["required"])).is_err());
    }

    #[test]
    fn values_keep_registration_order() {
        let store = FormStore::new();
        store.register("b", &Value::Null).unwrap();
        store.register("a", &Value::Null).unwrap();
        store.set_value("a", ResolvedValue::Flag(true));
        assert_eq!(store.values(), json!({"b": null, "a": true}));
        let keys = store.values().as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, ["b", "a"]);
    }
}
