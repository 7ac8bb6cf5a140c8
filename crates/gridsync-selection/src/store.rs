use std::collections::{BTreeSet, HashMap};

use gridsync_core::RowKey;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Tri-state of the select-all header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderState {
    Checked,
    Unchecked,
    Indeterminate,
}

impl HeaderState {
    /// Compute the header state of `visible` rows against a selection set
    pub fn of(visible: &[RowKey], selected: &BTreeSet<RowKey>) -> Self {
        if visible.is_empty() {
            return Self::Unchecked;
        }
        let count = visible.iter().filter(|key| selected.contains(key)).count();
        if count == 0 {
            Self::Unchecked
        } else if count == visible.len() {
            Self::Checked
        } else {
            Self::Indeterminate
        }
    }
}

/// Process-wide selected row set for one grid instance.
///
/// Every row that has been subscribed to gets its own observable cell, so a
/// toggle wakes only that row's subscribers and the aggregate view. The store
/// is the only writer; consumers observe through `subscribe`,
/// `subscribe_selected` or the read accessors.
pub struct SelectionStore {
    cells: Mutex<HashMap<RowKey, watch::Sender<bool>>>,
    selected: watch::Sender<BTreeSet<RowKey>>,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("selected", &*self.selected.borrow())
            .finish_non_exhaustive()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
            selected: watch::channel(BTreeSet::new()).0,
        }
    }

    pub fn is_selected(&self, key: RowKey) -> bool {
        self.selected.borrow().contains(&key)
    }

    /// Observe one row's selection flag.
    ///
    /// The row's cell lives while a receiver for it is alive; once every
    /// receiver is dropped the next write discards it.
    pub fn subscribe(&self, key: RowKey) -> watch::Receiver<bool> {
        let mut cells = self.cells.lock();
        cells
            .entry(key)
            .or_insert_with(|| watch::channel(self.is_selected(key)).0)
            .subscribe()
    }

    /// Observe the aggregate selected set
    pub fn subscribe_selected(&self) -> watch::Receiver<BTreeSet<RowKey>> {
        self.selected.subscribe()
    }

    /// Selected keys in key order
    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.selected.borrow().iter().copied().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.borrow().len()
    }

    /// Flip one row's selection, returning the new flag
    pub fn toggle(&self, key: RowKey) -> bool {
        let mut value = false;
        self.apply(|selected| {
            value = !selected.contains(&key);
            vec![(key, value)]
        });
        value
    }

    /// Set one row's selection flag
    pub fn set(&self, key: RowKey, value: bool) {
        self.apply(|_| vec![(key, value)]);
    }

    /// Select or deselect every visible row at once
    pub fn select_all(&self, visible: &[RowKey], value: bool) {
        tracing::debug!(rows = visible.len(), value, "select all");
        self.apply(|_| visible.iter().map(|key| (*key, value)).collect());
    }

    /// Deselect everything
    pub fn clear(&self) {
        self.apply(|selected| selected.iter().map(|key| (*key, false)).collect());
    }

    /// Header checkbox state for the rows currently in the viewport
    pub fn header_state(&self, visible: &[RowKey]) -> HeaderState {
        HeaderState::of(visible, &self.selected.borrow())
    }

    /// Positions of selected rows within `rows`, in row order
    pub fn selected_indices(&self, rows: &[RowKey]) -> Vec<usize> {
        let selected = self.selected.borrow();
        rows.iter()
            .enumerate()
            .filter(|(_, key)| selected.contains(key))
            .map(|(index, _)| index)
            .collect()
    }

    /// Carry a row's selection over to its new key, e.g. once a pending row
    /// has been inserted and received its persisted identifier
    pub fn replace_key(&self, from: RowKey, to: RowKey) {
        if from == to {
            return;
        }
        self.apply(|selected| {
            if selected.contains(&from) {
                vec![(from, false), (to, true)]
            } else {
                Vec::new()
            }
        });
    }

    fn apply(&self, changes: impl FnOnce(&BTreeSet<RowKey>) -> Vec<(RowKey, bool)>) {
        // The cells lock also serializes writers of the aggregate set
        let mut cells = self.cells.lock();
        let mut flipped = Vec::new();

        self.selected.send_if_modified(|selected| {
            for (key, value) in changes(selected) {
                let changed = if value {
                    selected.insert(key)
                } else {
                    selected.remove(&key)
                };
                if changed {
                    flipped.push((key, value));
                }
            }
            !flipped.is_empty()
        });

        for (key, value) in flipped {
            if let Some(cell) = cells.get(&key) {
                cell.send_replace(value);
            }
        }

        // Rows nobody observes any more lose their cell
        cells.retain(|_, cell| cell.receiver_count() > 0);
    }
}
