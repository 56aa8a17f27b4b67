use ratatui::layout::Rect;

/// The visible window onto the document, plus how far the document is scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub scroll_x: u16,
    pub scroll_y: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            scroll_x: 0,
            scroll_y: 0,
        }
    }

    pub fn with_scroll(mut self, scroll_x: u16, scroll_y: u16) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlaySize {
    pub width: u16,
    pub height: u16,
}

impl OverlaySize {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Where an overlay is mounted, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPlacement {
    pub top: i32,
    pub left: i32,
    pub open_above: bool,
}

impl OverlayPlacement {
    /// The on-screen rectangle for this placement, clipped to the viewport.
    pub fn screen_rect(&self, viewport: Viewport, size: OverlaySize) -> Rect {
        let top = self.top - i32::from(viewport.scroll_y);
        let left = self.left - i32::from(viewport.scroll_x);
        let bottom = (top + i32::from(size.height)).min(i32::from(viewport.height));
        let right = (left + i32::from(size.width)).min(i32::from(viewport.width));
        let top = top.max(0);
        let left = left.max(0);
        if bottom <= top || right <= left {
            return Rect::default();
        }
        Rect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        )
    }
}

/// Computes overlay placement relative to a trigger.
///
/// Overlays open below the trigger when they fit, otherwise above it. When
/// neither side fits, the side with more room wins. Horizontal position
/// follows the trigger's left edge unless clamping is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Positioner {
    gap: u16,
    clamp_horizontal: bool,
}

impl Positioner {
    pub fn new(gap: u16) -> Self {
        Self {
            gap,
            clamp_horizontal: false,
        }
    }

    pub fn with_horizontal_clamp(mut self, clamp: bool) -> Self {
        self.clamp_horizontal = clamp;
        self
    }

    pub fn gap(&self) -> u16 {
        self.gap
    }

    /// `trigger` is in screen coordinates; the result is in document coordinates.
    pub fn open(&self, trigger: Rect, size: OverlaySize, viewport: Viewport) -> OverlayPlacement {
        let gap = i32::from(self.gap);
        let height = i32::from(size.height);
        let trigger_top = i32::from(trigger.y);
        let trigger_bottom = i32::from(trigger.bottom());

        let space_below = i32::from(viewport.height) - trigger_bottom - gap;
        let space_above = trigger_top - gap;
        let open_above = if height <= space_below {
            false
        } else if height <= space_above {
            true
        } else {
            space_above > space_below
        };

        let top = if open_above {
            trigger_top - gap - height
        } else {
            trigger_bottom + gap
        };

        let mut left = i32::from(trigger.x);
        if self.clamp_horizontal {
            let max_left = i32::from(viewport.width) - i32::from(size.width);
            left = left.min(max_left).max(0);
        }

        OverlayPlacement {
            top: top + i32::from(viewport.scroll_y),
            left: left + i32::from(viewport.scroll_x),
            open_above,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 80,
        height: 40,
        scroll_x: 0,
        scroll_y: 0,
    };

    #[test]
    fn opens_below_with_room() {
        let trigger = Rect::new(4, 5, 30, 3);
        let placement = Positioner::new(1).open(trigger, OverlaySize::new(30, 10), VIEWPORT);
        assert!(!placement.open_above);
        assert_eq!(placement.top, 9);
        assert_eq!(placement.left, 4);
    }

    #[test]
    fn flips_above_when_bottom_is_too_close() {
        let trigger = Rect::new(4, 32, 30, 3);
        let placement = Positioner::new(1).open(trigger, OverlaySize::new(30, 10), VIEWPORT);
        assert!(placement.open_above);
        assert_eq!(placement.top, 32 - 1 - 10);
    }

    #[test]
    fn exact_fit_below_stays_below() {
        let trigger = Rect::new(0, 27, 10, 3);
        let placement = Positioner::new(0).open(trigger, OverlaySize::new(10, 10), VIEWPORT);
        assert!(!placement.open_above);
        let rect = placement.screen_rect(VIEWPORT, OverlaySize::new(10, 10));
        assert_eq!(rect.bottom(), 40);
    }

    #[test]
    fn neither_fits_prefers_larger_side() {
        let size = OverlaySize::new(10, 30);
        let low = Positioner::new(0).open(Rect::new(0, 25, 10, 3), size, VIEWPORT);
        assert!(low.open_above);
        let high = Positioner::new(0).open(Rect::new(0, 8, 10, 3), size, VIEWPORT);
        assert!(!high.open_above);
    }

    #[test]
    fn document_coordinates_include_scroll() {
        let viewport = VIEWPORT.with_scroll(0, 12);
        let size = OverlaySize::new(20, 6);
        let placement = Positioner::new(0).open(Rect::new(2, 4, 20, 3), size, viewport);
        assert_eq!(placement.top, 4 + 3 + 12);
        assert_eq!(placement.screen_rect(viewport, size), Rect::new(2, 7, 20, 6));
    }

    #[test]
    fn horizontal_position_is_not_flipped_by_default() {
        let size = OverlaySize::new(30, 5);
        let trigger = Rect::new(70, 2, 10, 3);
        let free = Positioner::new(0).open(trigger, size, VIEWPORT);
        assert_eq!(free.left, 70);
        assert_eq!(free.screen_rect(VIEWPORT, size).width, 10);

        let clamped = Positioner::new(0)
            .with_horizontal_clamp(true)
            .open(trigger, size, VIEWPORT);
        assert_eq!(clamped.left, 50);
    }
}
