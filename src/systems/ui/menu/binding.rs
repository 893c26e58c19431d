use smallvec::SmallVec;

use super::{defs::ItemId, pool::MenuId};

/// Which item of a menu opens which child menu. Each item links to at most
/// one child; a child may be reachable from several items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingTable {
    bindings: SmallVec<[(ItemId, MenuId); 4]>,
}

impl BindingTable {
    /// Records `item -> child`, returning the child it previously opened.
    pub fn bind(&mut self, item: ItemId, child: MenuId) -> Option<MenuId> {
        if let Some(entry) = self.bindings.iter_mut().find(|(bound, _)| *bound == item) {
            return Some(std::mem::replace(&mut entry.1, child));
        }
        self.bindings.push((item, child));
        None
    }

    pub fn child_for(&self, item: ItemId) -> Option<MenuId> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == item)
            .map(|(_, child)| *child)
    }

    pub fn unbind(&mut self, item: ItemId) -> Option<MenuId> {
        let position = self.bindings.iter().position(|(bound, _)| *bound == item)?;
        Some(self.bindings.remove(position).1)
    }

    /// Drops every binding to `child`, returning the items that pointed at it.
    pub fn unbind_child(&mut self, child: MenuId) -> SmallVec<[ItemId; 4]> {
        let items = self
            .bindings
            .iter()
            .filter(|(_, bound)| *bound == child)
            .map(|(item, _)| *item)
            .collect();
        self.bindings.retain(|(_, bound)| *bound != child);
        items
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, MenuId)> + '_ {
        self.bindings.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_an_item_replaces_its_child() {
        let mut table = BindingTable::default();
        let item = ItemId::from_raw(0);
        assert_eq!(table.bind(item, MenuId::from_index(1)), None);
        assert_eq!(
            table.bind(item, MenuId::from_index(2)),
            Some(MenuId::from_index(1))
        );
        assert_eq!(table.child_for(item), Some(MenuId::from_index(2)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unbind_child_removes_every_link_to_it() {
        let mut table = BindingTable::default();
        let child = MenuId::from_index(3);
        table.bind(ItemId::from_raw(0), child);
        table.bind(ItemId::from_raw(1), MenuId::from_index(4));
        table.bind(ItemId::from_raw(2), child);

        let items = table.unbind_child(child);
        assert_eq!(items.as_slice(), &[ItemId::from_raw(0), ItemId::from_raw(2)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.unbind(ItemId::from_raw(1)), Some(MenuId::from_index(4)));
        assert!(table.is_empty());
    }
}
