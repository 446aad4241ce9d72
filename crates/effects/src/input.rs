/// Host notifications an effect can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    PointerEnter,
    PointerMove,
    PointerLeave,
    Resize,
}

/// Pointer activity scoped to a single panel.
///
/// Positions are normalized to the panel: `(0, 0)` is the top-left corner and
/// `(1, 1)` the bottom-right, matching client-rect arithmetic on a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter { position: [f32; 2] },
    Move { position: [f32; 2] },
    Leave,
}

impl PointerEvent {
    /// Listener kind an effect must have registered to receive this event.
    pub fn listener(&self) -> ListenerKind {
        match self {
            PointerEvent::Enter { .. } => ListenerKind::PointerEnter,
            PointerEvent::Move { .. } => ListenerKind::PointerMove,
            PointerEvent::Leave => ListenerKind::PointerLeave,
        }
    }
}
