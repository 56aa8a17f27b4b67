use std::{cell::RefCell, fmt, rc::Rc};

use serde::Serialize;

use crate::domain::{BindingMode, ResolvedValue, ValueShape, Variant};

use super::store::{NativeChange, Registration};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeTarget {
    pub name: String,
    pub value: ResolvedValue,
}

/// Change payload sent to direct-mode callers, identical for every variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub target: ChangeTarget,
}

impl ChangeEvent {
    pub fn new(name: impl Into<String>, value: ResolvedValue) -> Self {
        Self {
            target: ChangeTarget {
                name: name.into(),
                value,
            },
        }
    }
}

pub type SharedValue = Rc<RefCell<ResolvedValue>>;

/// Caller-owned value plus change callback.
pub struct DirectBinding {
    value: Box<dyn Fn() -> ResolvedValue>,
    on_change: Box<dyn FnMut(&ChangeEvent)>,
}

impl DirectBinding {
    pub fn new(
        value: impl Fn() -> ResolvedValue + 'static,
        on_change: impl FnMut(&ChangeEvent) + 'static,
    ) -> Self {
        Self {
            value: Box::new(value),
            on_change: Box::new(on_change),
        }
    }

    /// A binding over a fresh state cell whose handler writes every change back.
    /// The returned cell is the caller's side of the state.
    pub fn local(initial: ResolvedValue) -> (Self, SharedValue) {
        let state = Rc::new(RefCell::new(initial));
        let reader = Rc::clone(&state);
        let writer = Rc::clone(&state);
        let binding = Self::new(
            move || reader.borrow().clone(),
            move |event| *writer.borrow_mut() = event.target.value.clone(),
        );
        (binding, state)
    }

    pub fn value(&self) -> ResolvedValue {
        (self.value)()
    }

    fn emit(&mut self, event: &ChangeEvent) {
        (self.on_change)(event)
    }
}

impl fmt::Debug for DirectBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectBinding")
            .field("value", &self.value())
            .finish_non_exhaustive()
    }
}

/// The value binding of one control, chosen once at construction.
#[derive(Debug)]
pub enum Binding {
    Delegated(Registration),
    Direct(DirectBinding),
}

impl Binding {
    /// Pick the binding for a control. When both a registration and a direct
    /// binding are supplied, text entry keeps the registration and every other
    /// variant is driven directly. With neither, the control keeps local state.
    pub fn resolve(
        variant: Variant,
        shape: ValueShape,
        registration: Option<Registration>,
        direct: Option<DirectBinding>,
    ) -> Self {
        let binding = match (registration, direct) {
            (Some(registration), Some(direct)) => {
                if variant.is_text_entry() {
                    Binding::Delegated(registration)
                } else {
                    Binding::Direct(direct)
                }
            }
            (Some(registration), None) => Binding::Delegated(registration),
            (None, Some(direct)) => Binding::Direct(direct),
            (None, None) => Binding::Direct(DirectBinding::local(ResolvedValue::empty(shape)).0),
        };
        tracing::debug!(variant = %variant, mode = ?binding.mode(), "resolved binding");
        binding
    }

    pub fn mode(&self) -> BindingMode {
        match self {
            Binding::Delegated(_) => BindingMode::Delegated,
            Binding::Direct(_) => BindingMode::Direct,
        }
    }

    pub fn current_value(&self, shape: ValueShape) -> ResolvedValue {
        let raw = match self {
            Binding::Delegated(registration) => registration.value(),
            Binding::Direct(direct) => Some(direct.value()),
        };
        raw.map(|value| value.coerce(shape))
            .unwrap_or_else(|| ResolvedValue::empty(shape))
    }

    pub fn emit(&mut self, name: &str, next: ResolvedValue) {
        match self {
            Binding::Delegated(registration) => {
                registration.on_native_change(&NativeChange::new(name, next))
            }
            Binding::Direct(direct) => direct.emit(&ChangeEvent::new(name, next)),
        }
    }

    pub fn registration(&self) -> Option<&Registration> {
        match self {
            Binding::Delegated(registration) => Some(registration),
            Binding::Direct(_) => None,
        }
    }
}
