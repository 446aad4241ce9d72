//! Mount/unmount state machine for a single panel's effect.
//!
//! ```text
//!   mount() ──▶ Loading ──texture ok──▶ Ready ──┐
//!                  │                            ├──unmount()──▶ Unmounted
//!                  └──texture error──▶ Degraded ┘
//! ```
//!
//! Pointer input reaches the strategy in every mounted state so targets are
//! current once the texture arrives, but simulation only advances when the
//! panel can actually be drawn.

use crossbeam_channel::TryRecvError;
use effects::{EffectKind, EffectStrategy, FrameTick, FrameUniforms, ListenerKind, PointerEvent};
use image::RgbaImage;

use crate::listeners::{ListenerHooks, PanelId};
use crate::loader::{TextureLoadError, TextureReceiver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Loading,
    Ready,
    Degraded { reason: String },
    Unmounted,
}

impl Lifecycle {
    pub fn is_drawable(&self) -> bool {
        matches!(self, Lifecycle::Ready | Lifecycle::Degraded { .. })
    }
}

/// Outcome of a completed background load, handed to the GPU side.
#[derive(Debug)]
pub enum TextureEvent {
    Loaded(RgbaImage),
    Failed(TextureLoadError),
}

pub struct EffectInstance {
    id: PanelId,
    strategy: Box<dyn EffectStrategy>,
    state: Lifecycle,
    registered: Vec<ListenerKind>,
    pending: Option<TextureReceiver>,
}

impl EffectInstance {
    /// Registers the strategy's listeners and enters `Loading`.
    pub fn mount(
        id: PanelId,
        strategy: Box<dyn EffectStrategy>,
        pending: TextureReceiver,
        hooks: &mut dyn ListenerHooks,
    ) -> Self {
        let registered = strategy.listeners().to_vec();
        for kind in &registered {
            hooks.add_listener(id, *kind);
        }
        tracing::debug!(panel = id, effect = %strategy.kind(), "mounted effect");
        Self {
            id,
            strategy,
            state: Lifecycle::Loading,
            registered,
            pending: Some(pending),
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn kind(&self) -> EffectKind {
        self.strategy.kind()
    }

    pub fn state(&self) -> &Lifecycle {
        &self.state
    }

    pub fn strategy(&self) -> &dyn EffectStrategy {
        self.strategy.as_ref()
    }

    /// Checks the background load without blocking. Returns the outcome the
    /// first time it becomes available while the panel is still loading.
    pub fn poll_texture(&mut self) -> Option<TextureEvent> {
        if self.state != Lifecycle::Loading {
            return None;
        }
        let received = match self.pending.as_ref()?.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(TextureLoadError::Disconnected),
        };
        self.pending = None;
        match received {
            Ok(image) => {
                self.state = Lifecycle::Ready;
                tracing::info!(panel = self.id, effect = %self.kind(), "texture ready");
                Some(TextureEvent::Loaded(image))
            }
            Err(err) => {
                tracing::warn!(
                    panel = self.id,
                    effect = %self.kind(),
                    error = %err,
                    "texture failed to load; using placeholder"
                );
                self.state = Lifecycle::Degraded {
                    reason: err.to_string(),
                };
                Some(TextureEvent::Failed(err))
            }
        }
    }

    /// Forwards `event` if the strategy registered for it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        if self.state == Lifecycle::Unmounted || !self.registered.contains(&event.listener()) {
            return false;
        }
        self.strategy.handle_pointer(event);
        true
    }

    /// Advances the effect. `None` while loading or after unmount.
    pub fn tick(&mut self, tick: FrameTick) -> Option<FrameUniforms> {
        if !self.state.is_drawable() {
            return None;
        }
        Some(self.strategy.update(tick))
    }

    /// Removes exactly the listeners added at mount and abandons any pending
    /// load. Calling it again does nothing.
    pub fn unmount(&mut self, hooks: &mut dyn ListenerHooks) {
        if self.state == Lifecycle::Unmounted {
            return;
        }
        for kind in self.registered.drain(..) {
            hooks.remove_listener(self.id, kind);
        }
        self.pending = None;
        self.state = Lifecycle::Unmounted;
        tracing::debug!(panel = self.id, "unmounted effect");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::thread;
    use std::time::Duration;

    use crossbeam_channel::bounded;
    use effects::{build_strategy, Tuning};

    use super::*;

    #[derive(Default)]
    struct CountingHooks {
        added: HashMap<ListenerKind, u32>,
        removed: HashMap<ListenerKind, u32>,
    }

    impl ListenerHooks for CountingHooks {
        fn add_listener(&mut self, _panel: PanelId, kind: ListenerKind) {
            *self.added.entry(kind).or_default() += 1;
        }

        fn remove_listener(&mut self, _panel: PanelId, kind: ListenerKind) {
            *self.removed.entry(kind).or_default() += 1;
        }
    }

    fn mount(
        kind: EffectKind,
        hooks: &mut CountingHooks,
    ) -> (
        EffectInstance,
        crossbeam_channel::Sender<Result<RgbaImage, TextureLoadError>>,
    ) {
        let (tx, rx) = bounded(1);
        let strategy = build_strategy(kind, &Tuning::default(), 0);
        (EffectInstance::mount(3, strategy, rx, hooks), tx)
    }

    #[test]
    fn loading_gates_simulation() {
        let mut hooks = CountingHooks::default();
        let (mut instance, tx) = mount(EffectKind::Ripple, &mut hooks);
        assert_eq!(instance.state(), &Lifecycle::Loading);
        assert!(instance.tick(FrameTick::steps(1)).is_none());
        assert!(instance.poll_texture().is_none());

        tx.send(Ok(RgbaImage::new(1, 1))).unwrap();
        assert!(matches!(instance.poll_texture(), Some(TextureEvent::Loaded(_))));
        assert_eq!(instance.state(), &Lifecycle::Ready);
        assert!(instance.tick(FrameTick::steps(1)).is_some());
        assert!(instance.poll_texture().is_none());
    }

    #[test]
    fn failed_load_degrades_but_keeps_drawing() {
        let mut hooks = CountingHooks::default();
        let (mut instance, tx) = mount(EffectKind::Glitch, &mut hooks);
        tx.send(Err(TextureLoadError::Empty)).unwrap();
        assert!(matches!(instance.poll_texture(), Some(TextureEvent::Failed(_))));
        assert!(matches!(instance.state(), Lifecycle::Degraded { reason } if reason.contains("no pixels")));
        assert!(instance.tick(FrameTick::steps(1)).is_some());
    }

    #[test]
    fn dead_loader_degrades() {
        let mut hooks = CountingHooks::default();
        let (mut instance, tx) = mount(EffectKind::Wavy, &mut hooks);
        drop(tx);
        assert!(matches!(instance.poll_texture(), Some(TextureEvent::Failed(TextureLoadError::Disconnected))));
    }

    #[test]
    fn unmount_while_loading_removes_exactly_what_was_added() {
        for kind in EffectKind::ALL {
            let mut hooks = CountingHooks::default();
            let (mut instance, tx) = mount(kind, &mut hooks);
            instance.unmount(&mut hooks);
            instance.unmount(&mut hooks);

            assert_eq!(hooks.added, hooks.removed, "{kind}");
            let total: u32 = hooks.removed.values().sum();
            assert_eq!(total as usize, instance.strategy().listeners().len());

            // Late result from the worker is dropped on the floor.
            let late = thread::spawn(move || tx.send(Ok(RgbaImage::new(1, 1))).is_err());
            assert!(late.join().unwrap());
            assert!(instance.poll_texture().is_none());
            assert!(instance.tick(FrameTick::steps(1)).is_none());
            assert_eq!(instance.state(), &Lifecycle::Unmounted);
        }
    }

    #[test]
    fn unmount_during_real_background_load() {
        let mut hooks = CountingHooks::default();
        let rx = crate::loader::spawn_load(
            crate::loader::ImageSource::File("/nonexistent/warpfx.png".into()),
            Default::default(),
            64,
        )
        .unwrap();
        let strategy = build_strategy(EffectKind::Ripple, &Tuning::default(), 0);
        let mut instance = EffectInstance::mount(0, strategy, rx, &mut hooks);
        instance.unmount(&mut hooks);
        thread::sleep(Duration::from_millis(20));
        assert!(instance.poll_texture().is_none());
        assert_eq!(hooks.added, hooks.removed);
    }

    #[test]
    fn pointer_events_respect_registrations() {
        let mut hooks = CountingHooks::default();
        let (mut glitch, _tx) = mount(EffectKind::Glitch, &mut hooks);
        assert!(!glitch.handle_pointer(PointerEvent::Move { position: [0.5, 0.5] }));
        assert!(glitch.handle_pointer(PointerEvent::Enter { position: [0.5, 0.5] }));
        glitch.unmount(&mut hooks);
        assert!(!glitch.handle_pointer(PointerEvent::Leave));
    }
}
