use std::{cell::Cell, rc::Rc};

use ratatui::layout::Rect;

use super::{
    ContainerRef, DismissGuard, OverlayPlacement, OverlaySize, PointerHub, Positioner, Viewport,
};

/// Open/closed lifecycle of one floating surface.
///
/// The dismiss listener lives in `guard` and is only present while open. An
/// outside pointer-down flips the shared `open` flag from inside the hub;
/// [`OverlaySurface::sync`] notices that and drops the stale guard.
#[derive(Debug, Default)]
pub struct OverlaySurface {
    open: Rc<Cell<bool>>,
    visible: bool,
    guard: Option<DismissGuard>,
    placement: Option<OverlayPlacement>,
    size: OverlaySize,
    container: ContainerRef,
}

impl OverlaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// False for the first frame after mounting so the entry transition can
    /// start from the pre-transition state.
    pub fn is_visible(&self) -> bool {
        self.is_open() && self.visible
    }

    pub fn open(
        &mut self,
        hub: &PointerHub,
        positioner: &Positioner,
        trigger: Rect,
        size: OverlaySize,
        viewport: Viewport,
    ) -> OverlayPlacement {
        self.guard = None;
        let placement = positioner.open(trigger, size, viewport);
        self.placement = Some(placement);
        self.size = size;
        self.visible = false;
        self.container.set_regions([trigger]);
        self.open.set(true);
        let flag = Rc::clone(&self.open);
        self.guard = Some(hub.register_outside_dismiss(self.container.clone(), move || {
            flag.set(false)
        }));
        placement
    }

    /// Returns whether the surface was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.open.replace(false);
        self.release();
        was_open
    }

    /// Finish a dismissal that happened inside the hub. Returns true when one did.
    pub fn sync(&mut self) -> bool {
        if !self.open.get() && self.guard.is_some() {
            self.release();
            return true;
        }
        false
    }

    pub fn tick(&mut self) {
        if self.is_open() {
            self.visible = true;
        }
    }

    pub fn placement(&self) -> Option<OverlayPlacement> {
        self.placement.filter(|_| self.is_open())
    }

    pub fn size(&self) -> OverlaySize {
        self.size
    }

    pub fn container(&self) -> &ContainerRef {
        &self.container
    }

    fn release(&mut self) {
        self.guard = None;
        self.placement = None;
        self.visible = false;
        self.container.clear();
    }
}
