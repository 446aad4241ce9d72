//! Turns window-level cursor motion into per-panel pointer events.

use effects::PointerEvent;

use crate::layout::{hit_test, PanelRect};
use crate::listeners::PanelId;

/// Remembers which panel the cursor is over so crossings produce
/// `Leave` on the old panel followed by `Enter` and `Move` on the new one.
#[derive(Debug, Default)]
pub struct PointerRouter {
    hovered: Option<PanelId>,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<PanelId> {
        self.hovered
    }

    /// Events produced by the cursor moving to `(x, y)` in window pixels.
    pub fn moved(&mut self, rects: &[PanelRect], x: f64, y: f64) -> Vec<(PanelId, PointerEvent)> {
        let hit = hit_test(rects, x, y);
        let mut events = Vec::with_capacity(3);
        if hit != self.hovered {
            if let Some(previous) = self.hovered.take() {
                events.push((previous, PointerEvent::Leave));
            }
            if let Some(entered) = hit {
                let position = rects[entered].normalize(x, y);
                events.push((entered, PointerEvent::Enter { position }));
            }
            self.hovered = hit;
        }
        if let Some(current) = hit {
            let position = rects[current].normalize(x, y);
            events.push((current, PointerEvent::Move { position }));
        }
        events
    }

    /// The cursor left the window.
    pub fn left(&mut self) -> Option<(PanelId, PointerEvent)> {
        self.hovered.take().map(|panel| (panel, PointerEvent::Leave))
    }

    /// Forgets the hovered panel without emitting anything, used when the
    /// panels themselves are torn down.
    pub fn reset(&mut self) {
        self.hovered = None;
    }
}
