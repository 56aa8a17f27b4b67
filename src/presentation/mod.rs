mod body;
mod footer;
mod portal;
mod view;

pub use body::control_height;
pub use view::{UiContext, draw};
