pub mod calendar;
mod control;
pub mod date_mode;
mod palette;
pub mod selection;
mod state;
mod text;

pub use calendar::CalendarState;
pub use control::{Control, ControlLayout, ControlProps, DropdownRow, HitTarget};
pub use palette::ControlPalette;
pub use state::FormState;
pub use text::TextBuffer;
