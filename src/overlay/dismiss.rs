//! Document-level pointer-down listeners used for outside dismissal.
//!
//! Each open overlay holds exactly one listener through a [`DismissGuard`].
//! Dropping the guard detaches the listener, so closing the overlay and
//! tearing down its control both release it. A listener that fires is
//! removed before its callback runs.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use indexmap::IndexMap;
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDown {
    pub column: u16,
    pub row: u16,
}

impl PointerDown {
    pub fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }
}

/// Screen regions that count as "inside" an overlay: its trigger and surface.
#[derive(Debug, Clone, Default)]
pub struct ContainerRef(Rc<RefCell<Vec<Rect>>>);

impl ContainerRef {
    pub fn set_regions(&self, regions: impl IntoIterator<Item = Rect>) {
        let mut current = self.0.borrow_mut();
        current.clear();
        current.extend(regions.into_iter().filter(|rect| !rect.is_empty()));
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn contains(&self, event: PointerDown) -> bool {
        self.0
            .borrow()
            .iter()
            .any(|rect| rect_contains(*rect, event.column, event.row))
    }
}

pub(crate) fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

struct Listener {
    container: ContainerRef,
    on_dismiss: Box<dyn FnMut()>,
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    listeners: IndexMap<ListenerId, Listener>,
}

#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Rc<RefCell<HubState>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_outside_dismiss(
        &self,
        container: ContainerRef,
        on_dismiss: impl FnMut() + 'static,
    ) -> DismissGuard {
        let mut state = self.inner.borrow_mut();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.insert(
            id,
            Listener {
                container,
                on_dismiss: Box::new(on_dismiss),
            },
        );
        tracing::trace!(listener = id.0, active = state.listeners.len(), "dismiss listener attached");
        DismissGuard {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver a pointer-down; returns how many overlays were dismissed.
    pub fn dispatch(&self, event: PointerDown) -> usize {
        let fired = {
            let mut state = self.inner.borrow_mut();
            let outside = state
                .listeners
                .iter()
                .filter(|(_, listener)| !listener.container.contains(event))
                .map(|(id, _)| *id)
                .collect::<Vec<_>>();
            outside
                .into_iter()
                .filter_map(|id| state.listeners.shift_remove(&id))
                .collect::<Vec<_>>()
        };
        let count = fired.len();
        for mut listener in fired {
            (listener.on_dismiss)();
        }
        if count > 0 {
            tracing::debug!(column = event.column, row = event.row, count, "outside pointer dismissed overlays");
        }
        count
    }

    pub fn active_listeners(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl fmt::Debug for PointerHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerHub")
            .field("active_listeners", &self.active_listeners())
            .finish()
    }
}

/// Keeps one dismiss listener attached for as long as it lives.
#[derive(Debug)]
pub struct DismissGuard {
    id: ListenerId,
    hub: Weak<RefCell<HubState>>,
}

impl DismissGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for DismissGuard {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().listeners.shift_remove(&self.id);
        }
    }
}
