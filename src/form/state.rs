use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyEvent;
use serde_json::Value;
use time::Date;

use crate::binding::{ChangeEvent, DirectBinding, FormStore};
use crate::domain::{BindingMode, FormDefinition};
use crate::overlay::{PointerDown, PointerHub, Positioner};

use super::{
    control::{Control, ControlProps},
    palette::ControlPalette,
};

/// Every control of one form, the store behind them and keyboard focus.
#[derive(Debug)]
pub struct FormState {
    title: String,
    description: Option<String>,
    controls: Vec<Control>,
    focus: usize,
    scroll_offset: u16,
    store: FormStore,
    hub: PointerHub,
}

impl FormState {
    pub fn from_definition(
        definition: &FormDefinition,
        palette: Arc<ControlPalette>,
        positioner: Positioner,
        today: Date,
    ) -> Result<Self> {
        let store = FormStore::new();
        let hub = PointerHub::new();
        let mut controls = Vec::with_capacity(definition.fields.len());
        for (index, field) in definition.fields.iter().enumerate() {
            let spec = field.to_spec(&format!("/fields/{index}"))?;
            let registration = store.register(&spec.name, &spec.rules)?;
            if let Some(default) = field.default_value() {
                store.seed(&spec.name, default.coerce(spec.value_shape()));
            }
            let direct = store_backed_binding(&store, &spec.name);
            let props = ControlProps::new(spec).with_options(field.normalized_options());
            let props = match field.binding {
                Some(BindingMode::Delegated) => props.with_registration(registration),
                Some(BindingMode::Direct) => props.with_direct(direct),
                None => props.with_registration(registration).with_direct(direct),
            };
            controls.push(
                Control::new(props, &hub)
                    .with_palette(Arc::clone(&palette))
                    .with_positioner(positioner)
                    .with_today(today),
            );
        }
        Ok(Self::from_parts(
            definition.title.clone().unwrap_or_default(),
            controls,
            store,
            hub,
        )
        .with_description(definition.description.clone()))
    }

    /// Assemble a form from controls built against `hub`.
    pub fn from_parts(
        title: impl Into<String>,
        controls: Vec<Control>,
        store: FormStore,
        hub: PointerHub,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            controls,
            focus: 0,
            scroll_offset: 0,
            store,
            hub,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut [Control] {
        &mut self.controls
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.spec().name == name)
    }

    /// Look a control up by its element id, which defaults to the field name.
    pub fn control_by_id(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.spec().id == id)
    }

    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls
            .iter_mut()
            .find(|control| control.spec().name == name)
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn hub(&self) -> &PointerHub {
        &self.hub
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> Option<&Control> {
        self.controls.get(self.focus)
    }

    pub fn focused_mut(&mut self) -> Option<&mut Control> {
        self.controls.get_mut(self.focus)
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub(crate) fn set_scroll_offset(&mut self, offset: u16) {
        self.scroll_offset = offset;
    }

    /// Move focus, closing whatever the previously focused control had open.
    pub fn set_focus(&mut self, index: usize) {
        if index >= self.controls.len() || index == self.focus {
            return;
        }
        if let Some(control) = self.controls.get_mut(self.focus) {
            control.close();
        }
        self.focus = index;
    }

    pub fn focus_next(&mut self) {
        if self.controls.is_empty() {
            return;
        }
        self.set_focus((self.focus + 1) % self.controls.len());
    }

    pub fn focus_prev(&mut self) {
        if self.controls.is_empty() {
            return;
        }
        let len = self.controls.len();
        self.set_focus((self.focus + len - 1) % len);
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let handled = self
            .focused_mut()
            .is_some_and(|control| control.handle_key(key));
        if handled {
            self.refresh_errors();
        }
        handled
    }

    /// A pointer-down anywhere on screen: outside dismissal first, then the
    /// click (when `click` is set) goes to an open overlay before any field.
    pub fn dispatch_pointer(&mut self, column: u16, row: u16, click: bool) -> bool {
        let dismissed = self.hub.dispatch(PointerDown::new(column, row));
        for control in &mut self.controls {
            control.sync();
        }
        if !click {
            return dismissed > 0;
        }
        let target = self.control_at(column, row);
        let Some(index) = target else {
            return dismissed > 0;
        };
        self.set_focus(index);
        self.controls[index].handle_click(column, row);
        self.refresh_errors();
        true
    }

    /// The control a pointer at this cell lands on. An open overlay wins
    /// over any field drawn beneath it.
    pub fn control_at(&self, column: u16, row: u16) -> Option<usize> {
        self.controls
            .iter()
            .position(|control| control.overlay_contains(column, row))
            .or_else(|| {
                self.controls
                    .iter()
                    .position(|control| control.contains_point(column, row))
            })
    }

    /// The control whose overlay is currently open.
    pub fn open_control(&self) -> Option<&Control> {
        self.controls.iter().find(|control| control.is_open())
    }

    pub fn close_focused(&mut self) -> bool {
        self.focused_mut().is_some_and(Control::close)
    }

    pub fn any_open(&self) -> bool {
        self.controls.iter().any(Control::is_open)
    }

    pub fn tick(&mut self) {
        for control in &mut self.controls {
            control.tick();
        }
    }

    /// Run the store's rules over every field; returns the number of errors.
    pub fn validate(&mut self) -> usize {
        let issues = self.store.validate();
        self.refresh_errors();
        issues
    }

    pub fn refresh_errors(&mut self) {
        for control in &mut self.controls {
            let error = self.store.error(&control.spec().name);
            control.set_error(error);
        }
    }

    pub fn values(&self) -> Value {
        self.store.values()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }
}

/// A caller-side binding that reads and writes through the store.
fn store_backed_binding(store: &FormStore, name: &str) -> DirectBinding {
    let reader = store.clone();
    let writer = store.clone();
    let name = name.to_string();
    DirectBinding::new(
        move || reader.watch(&name).unwrap_or_default(),
        move |event: &ChangeEvent| writer.set_value(&event.target.name, event.target.value.clone()),
    )
}
