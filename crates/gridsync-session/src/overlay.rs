//! Registry of transient overlays spawned by field widgets
//!
//! Dropdowns, date pickers and popovers render outside the edited row, so a
//! pointer event landing in one of them looks like a click-away. Widgets
//! register the overlay while it is open and the controller consults the
//! registry before committing.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct OverlayRegistry {
    next_id: AtomicU64,
    open: Mutex<BTreeMap<u64, String>>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an overlay as open until the returned guard is dropped
    pub fn register(self: &Arc<Self>, kind: impl Into<String>) -> OverlayGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let kind = kind.into();
        tracing::debug!(id, kind = %kind, "overlay opened");
        self.open.lock().insert(id, kind);
        OverlayGuard {
            registry: Arc::clone(self),
            id,
        }
    }

    pub fn has_open(&self) -> bool {
        !self.open.lock().is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.open.lock().len()
    }

    /// Kinds of the overlays currently open, oldest first
    pub fn open_kinds(&self) -> Vec<String> {
        self.open.lock().values().cloned().collect()
    }
}

/// Keeps an overlay registered; dropping it closes the overlay
#[must_use = "the overlay is unregistered as soon as the guard is dropped"]
#[derive(Debug)]
pub struct OverlayGuard {
    registry: Arc<OverlayRegistry>,
    id: u64,
}

impl Drop for OverlayGuard {
    fn drop(&mut self) {
        if self.registry.open.lock().remove(&self.id).is_some() {
            tracing::debug!(id = self.id, "overlay closed");
        }
    }
}
