use crate::model::Net;

/// Holds the saved "initial state" a run can be restarted from.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    saved: Option<Net>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        SnapshotStore::default()
    }

    /// Captures a deep copy of the net, transient flags included.
    pub fn save(&mut self, net: &Net) {
        self.saved = Some(net.clone());
    }

    /// A fresh copy of the saved net, renumbered, or `None` if nothing was saved.
    pub fn restore(&self) -> Option<Net> {
        let mut net = self.saved.clone()?;
        net.renumber();
        Some(net)
    }

    pub fn invalidate(&mut self) {
        self.saved = None;
    }

    pub fn is_saved(&self) -> bool {
        self.saved.is_some()
    }
}
