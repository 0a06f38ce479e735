//! Cross-view selection produced by brushing the map.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use squirrel_model::RecordId;

use crate::events::{Dispatcher, SubscriptionId};

/// Events published by [`SelectionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionEvent {
    /// Selection membership changed; the payload is the new selection.
    Change,
}

/// Snapshot of the selected identifiers.
///
/// An empty set means "no selection".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub ids: BTreeSet<RecordId>,
}

impl Selection {
    pub fn is_active(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }
}

impl FromIterator<RecordId> for Selection {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Owner of the current selection.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selected: BTreeSet<RecordId>,
    dispatcher: Dispatcher<SelectionEvent, Selection>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection.
    ///
    /// Publishes [`SelectionEvent::Change`] only when membership differs from
    /// the previous selection. Returns whether it did.
    pub fn set(&mut self, ids: impl IntoIterator<Item = RecordId>) -> bool {
        let next: BTreeSet<RecordId> = ids.into_iter().collect();
        if next == self.selected {
            debug!(selected = next.len(), "selection unchanged");
            return false;
        }
        self.selected = next;
        self.publish();
        true
    }

    /// Drop the selection. Publishes only if something was selected.
    pub fn clear(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        self.publish();
        true
    }

    /// Copy of the current selection.
    pub fn get(&self) -> Selection {
        Selection {
            ids: self.selected.clone(),
        }
    }

    /// Whether any identifier is selected.
    pub fn has(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn on(
        &mut self,
        event: SelectionEvent,
        handler: impl FnMut(&Selection) + 'static,
    ) -> SubscriptionId {
        self.dispatcher.on(event, handler)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.dispatcher.off(id)
    }

    fn publish(&mut self) {
        let snapshot = self.get();
        debug!(selected = snapshot.len(), "selection changed");
        self.dispatcher.emit(SelectionEvent::Change, &snapshot);
    }
}
