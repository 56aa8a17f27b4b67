#![deny(rust_2018_idioms)]

pub mod app;
pub mod binding;
pub mod domain;
pub mod form;
pub mod io;
pub mod overlay;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use app::{FormUI, UiOptions};
pub use binding::{Binding, ChangeEvent, DirectBinding, FormStore, Registration};
pub use domain::{FieldSpec, OptionEntry, OptionGroup, OptionItem, ResolvedValue, Variant};
pub use form::{Control, ControlPalette, ControlProps, FormState};
pub use overlay::{PointerHub, Positioner};

pub mod prelude {
    pub use super::{
        Control, ControlProps, DirectBinding, FieldSpec, FormStore, FormUI, OptionEntry,
        PointerHub, ResolvedValue, UiOptions, Variant,
    };
}
