mod dismiss;
mod placement;
mod surface;

pub(crate) use dismiss::rect_contains;
pub use dismiss::{ContainerRef, DismissGuard, ListenerId, PointerDown, PointerHub};
pub use placement::{OverlayPlacement, OverlaySize, Positioner, Viewport};
pub use surface::OverlaySurface;
