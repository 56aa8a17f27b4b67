pub(crate) mod input;
mod form_ui;
mod options;
pub(crate) mod runtime;
mod status;
mod terminal;

pub use form_ui::FormUI;
pub use options::UiOptions;
