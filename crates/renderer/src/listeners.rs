use std::collections::BTreeMap;

use effects::ListenerKind;

/// Identifies a mounted panel within the host.
pub type PanelId = usize;

/// Registration seam between effect instances and whatever dispatches host
/// notifications to them.
pub trait ListenerHooks {
    fn add_listener(&mut self, panel: PanelId, kind: ListenerKind);
    fn remove_listener(&mut self, panel: PanelId, kind: ListenerKind);
}

/// Host-side dispatch table: which panels currently listen for what.
#[derive(Debug, Default)]
pub struct ListenerTable {
    registrations: BTreeMap<(PanelId, ListenerKind), u32>,
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wants(&self, panel: PanelId, kind: ListenerKind) -> bool {
        self.registrations.contains_key(&(panel, kind))
    }

    /// Total registrations still outstanding across every panel.
    pub fn len(&self) -> usize {
        self.registrations.values().map(|count| *count as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Panels that want `kind`, in id order.
    pub fn panels_for(&self, kind: ListenerKind) -> impl Iterator<Item = PanelId> + '_ {
        self.registrations
            .keys()
            .filter(move |(_, registered)| *registered == kind)
            .map(|(panel, _)| *panel)
    }
}

impl ListenerHooks for ListenerTable {
    fn add_listener(&mut self, panel: PanelId, kind: ListenerKind) {
        *self.registrations.entry((panel, kind)).or_insert(0) += 1;
    }

    fn remove_listener(&mut self, panel: PanelId, kind: ListenerKind) {
        let key = (panel, kind);
        match self.registrations.get_mut(&key) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.registrations.remove(&key);
            }
            None => {
                tracing::warn!(panel, ?kind, "removing a listener that was never added");
            }
        }
    }
}
