//! Host callbacks registered on a menu.
//!
//! Listeners receive the menu itself, so they can read the selection or
//! update item values in place. During dispatch the listeners of the kind
//! being fired are detached from the menu; listeners subscribed to that kind
//! from inside a callback are kept and run from the next dispatch on, while
//! `unsubscribe` and `clear` take effect immediately.
use std::fmt;

use smallvec::SmallVec;

use crate::systems::interaction::Direction;

use super::{defs::ItemId, Menu};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

pub type OpenListener = Box<dyn FnMut(&mut Menu) + Send + Sync>;
pub type ItemListener = Box<dyn FnMut(&mut Menu, ItemId, usize) + Send + Sync>;
pub type LeftRightListener = Box<dyn FnMut(&mut Menu, ItemId, usize, Direction) + Send + Sync>;

pub struct Listeners<F> {
    entries: Vec<(ListenerId, F)>,
    dispatch: Option<PendingChanges>,
}

/// Removals requested while the list's own listeners are running.
#[derive(Debug, Default)]
struct PendingChanges {
    running: SmallVec<[ListenerId; 4]>,
    removed: SmallVec<[ListenerId; 4]>,
    cleared: bool,
}

impl PendingChanges {
    fn removes(&self, id: ListenerId) -> bool {
        self.cleared || self.removed.contains(&id)
    }
}

impl<F> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            dispatch: None,
        }
    }
}

impl<F> fmt::Debug for Listeners<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("ids", &self.entries.iter().map(|(id, _)| *id).collect::<Vec<_>>())
            .field("dispatching", &self.dispatch.is_some())
            .finish()
    }
}

impl<F> Listeners<F> {
    fn push(&mut self, id: ListenerId, listener: F) {
        self.entries.push((id, listener));
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        let mut removed = self.entries.len() != before;
        if let Some(pending) = self.dispatch.as_mut() {
            if pending.running.contains(&id) && !pending.removes(id) {
                pending.removed.push(id);
                removed = true;
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        if let Some(pending) = self.dispatch.as_mut() {
            pending.cleared = true;
        }
    }

    /// Live listener count; listeners running right now are not counted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detaches the listeners for a dispatch. `None` while a dispatch of this
    /// kind is already running.
    pub(super) fn begin_dispatch(&mut self) -> Option<Self> {
        if self.dispatch.is_some() {
            return None;
        }
        let entries = std::mem::take(&mut self.entries);
        self.dispatch = Some(PendingChanges {
            running: entries.iter().map(|(id, _)| *id).collect(),
            ..PendingChanges::default()
        });
        Some(Self {
            entries,
            dispatch: None,
        })
    }

    pub(super) fn is_removed(&self, id: ListenerId) -> bool {
        self.dispatch
            .as_ref()
            .is_some_and(|pending| pending.removes(id))
    }

    pub(super) fn iter_mut(&mut self) -> impl Iterator<Item = (ListenerId, &mut F)> + '_ {
        self.entries.iter_mut().map(|(id, listener)| (*id, listener))
    }

    /// Puts dispatched listeners back ahead of any added while they ran,
    /// dropping those removed in the meantime.
    pub(super) fn finish_dispatch(&mut self, mut dispatched: Self) {
        if let Some(pending) = self.dispatch.take() {
            dispatched
                .entries
                .retain(|(id, _)| !pending.removes(*id));
        }
        dispatched.entries.append(&mut self.entries);
        self.entries = dispatched.entries;
    }
}

#[derive(Debug, Default)]
pub struct MenuListeners {
    next_id: u32,
    pub open: Listeners<OpenListener>,
    pub highlighted: Listeners<ItemListener>,
    pub selected: Listeners<ItemListener>,
    pub left_right: Listeners<LeftRightListener>,
}

impl MenuListeners {
    fn allocate(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn on_open(&mut self, listener: impl FnMut(&mut Menu) + Send + Sync + 'static) -> ListenerId {
        let id = self.allocate();
        self.open.push(id, Box::new(listener));
        id
    }

    pub fn on_highlighted(
        &mut self,
        listener: impl FnMut(&mut Menu, ItemId, usize) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.allocate();
        self.highlighted.push(id, Box::new(listener));
        id
    }

    pub fn on_selected(
        &mut self,
        listener: impl FnMut(&mut Menu, ItemId, usize) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.allocate();
        self.selected.push(id, Box::new(listener));
        id
    }

    pub fn on_left_right(
        &mut self,
        listener: impl FnMut(&mut Menu, ItemId, usize, Direction) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.allocate();
        self.left_right.push(id, Box::new(listener));
        id
    }

    /// Removes a listener of any kind.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.open.unsubscribe(id)
            || self.highlighted.unsubscribe(id)
            || self.selected.unsubscribe(id)
            || self.left_right.unsubscribe(id)
    }

    pub fn clear(&mut self) {
        self.open.clear();
        self.highlighted.clear();
        self.selected.clear();
        self.left_right.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
            && self.highlighted.is_empty()
            && self.selected.is_empty()
            && self.left_right.is_empty()
    }
}
