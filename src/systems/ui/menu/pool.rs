//! Owner of every menu and of the state shared between them.
use std::time::Duration;

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::systems::{
    audio::{AudioCue, MenuSound},
    interaction::{FrameInput, InputGate, InputSource, InputTiming},
    ui::menu_surface::Renderer,
};

use super::{
    defs::{Item, ItemId},
    Menu, MenuTransition,
};

/// Registration-order handle of a menu inside its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(usize);

impl MenuId {
    pub(super) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Resource, Debug, Default)]
pub struct MenuPool {
    menus: Vec<Menu>,
    gate: InputGate,
    last_used: Option<MenuId>,
}

impl MenuPool {
    pub fn new(timing: InputTiming) -> Self {
        Self {
            menus: Vec::new(),
            gate: InputGate::new(timing),
            last_used: None,
        }
    }

    pub fn register(&mut self, menu: Menu) -> MenuId {
        let id = MenuId(self.menus.len());
        self.menus.push(menu);
        if self.last_used.is_none() {
            self.last_used = Some(id);
        }
        id
    }

    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(id.0)
    }

    pub fn menu_mut(&mut self, id: MenuId) -> Option<&mut Menu> {
        self.menus.get_mut(id.0)
    }

    pub fn menus(&self) -> impl Iterator<Item = (MenuId, &Menu)> + '_ {
        self.menus
            .iter()
            .enumerate()
            .map(|(index, menu)| (MenuId(index), menu))
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    pub fn last_used(&self) -> Option<MenuId> {
        self.last_used
    }

    pub fn gate(&self) -> &InputGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut InputGate {
        &mut self.gate
    }

    /// Blocks every input edge for `wait`, counted from the current frame.
    pub fn set_input_wait(&mut self, wait: Duration) {
        self.gate.rearm(wait);
    }

    /// Links `item` of `parent` to `child`. Accepting the item while it is
    /// selected hides the parent and shows the child; cancelling in the child
    /// shows the parent again.
    pub fn bind(&mut self, parent: MenuId, child: MenuId, item: ItemId) -> bool {
        if parent == child {
            warn!("refusing to bind menu {parent:?} to itself");
            return false;
        }
        if self.menu(child).is_none_or(Menu::is_disposed) {
            warn!("cannot bind unknown or disposed menu {child:?}");
            return false;
        }
        let Some(parent_menu) = self.menus.get_mut(parent.0) else {
            warn!("cannot bind into unknown menu {parent:?}");
            return false;
        };
        if !parent_menu.contains_item(item) {
            warn!(
                "menu `{}`: cannot bind unknown item {item:?}",
                parent_menu.title()
            );
            return false;
        }
        if let Some(linked) = parent_menu.item_mut(item) {
            linked.linked_submenu = Some(child);
        }
        parent_menu.bindings.bind(item, child);

        if let Some(child_menu) = self.menus.get_mut(child.0) {
            child_menu.parent = Some(parent);
            child_menu.parent_item = Some(item);
        }
        true
    }

    /// Registers `child`, appends a submenu link for it to `parent` and binds
    /// the two. The link text carries the parent's submenu indicator.
    pub fn add_submenu(
        &mut self,
        mut child: Menu,
        parent: MenuId,
        text: &str,
        description: Option<&str>,
        inherit_colors: bool,
    ) -> Option<(MenuId, ItemId)> {
        let Some(parent_menu) = self.menu(parent) else {
            warn!("cannot add submenu `{text}` to unknown menu {parent:?}");
            return None;
        };
        if inherit_colors {
            child.apply_color_scheme(*parent_menu.theme());
        }
        let mut link = Item::submenu_link(format!(
            "{text}{}",
            parent_menu.layout().submenu_indicator
        ));
        if let Some(description) = description {
            link.set_description(description);
        }

        let child_id = self.register(child);
        let item = self.menus.get_mut(parent.0)?.add_item(link);
        self.bind(parent, child_id, item);
        Some((child_id, item))
    }

    pub fn set_visible(&mut self, id: MenuId, visible: bool) {
        match self.menus.get_mut(id.0) {
            Some(menu) => menu.set_visible(visible),
            None => warn!("cannot change visibility of unknown menu {id:?}"),
        }
    }

    pub fn is_any_open(&self) -> bool {
        self.menus.iter().any(Menu::is_visible)
    }

    pub fn close_all(&mut self) {
        let visible: SmallVec<[MenuId; 8]> = self.visible_ids();
        for id in visible {
            self.set_visible(id, false);
        }
    }

    /// Closes everything when anything is open, otherwise flips the menu that
    /// was drawn last.
    pub fn toggle_last_or_close_any(&mut self) {
        if self.is_any_open() {
            self.close_all();
            return;
        }
        if let Some(id) = self.last_used {
            let visible = self.menu(id).is_some_and(Menu::is_visible);
            self.set_visible(id, !visible);
        }
    }

    /// Hides `id` and shows its parent, if it has one.
    pub fn go_back(&mut self, id: MenuId, with_sound: bool, audio: &mut dyn AudioCue) {
        let Some(menu) = self.menus.get_mut(id.0) else {
            warn!("cannot go back from unknown menu {id:?}");
            return;
        };
        menu.set_visible(false);
        let parent = menu.parent();
        if with_sound {
            audio.play(MenuSound::Back);
        }
        self.gate.rearm_transition();
        if let Some(parent) = parent {
            self.set_visible(parent, true);
        }
    }

    /// Releases the menu's listeners and bindings and unlinks it from its
    /// parent and children. The id stays reserved; the menu can no longer be shown.
    pub fn dispose(&mut self, id: MenuId) {
        let Some(menu) = self.menus.get_mut(id.0) else {
            warn!("cannot dispose unknown menu {id:?}");
            return;
        };
        debug!("disposing menu `{}`", menu.title());
        menu.release();

        for other in self.menus.iter_mut() {
            if other.parent == Some(id) {
                other.parent = None;
                other.parent_item = None;
            }
            for item in other.bindings.unbind_child(id) {
                if let Some(linked) = other.item_mut(item) {
                    linked.linked_submenu = None;
                }
            }
        }
        if self.last_used == Some(id) {
            self.last_used = self
                .menus
                .iter()
                .position(|menu| !menu.is_disposed())
                .map(MenuId);
        }
    }

    pub fn remove_all(&mut self) {
        self.menus.clear();
        self.last_used = None;
    }

    fn visible_ids(&self) -> SmallVec<[MenuId; 8]> {
        self.menus()
            .filter(|(_, menu)| menu.is_visible())
            .map(|(id, _)| id)
            .collect()
    }

    /// Runs one frame for every visible menu in registration order.
    pub fn tick(
        &mut self,
        elapsed_seconds: f32,
        input: &dyn InputSource,
        audio: &mut dyn AudioCue,
        renderer: &mut dyn Renderer,
    ) {
        self.gate.advance(elapsed_seconds);
        let fast = input.is_fast_modifier_held();
        for menu in self.menus.iter_mut() {
            menu.begin_frame(fast);
        }

        for id in self.visible_ids() {
            let Some(menu) = self.menus.get_mut(id.0) else {
                continue;
            };
            if !menu.is_visible() {
                continue;
            }
            let mut frame = FrameInput {
                gate: &mut self.gate,
                input,
                audio: &mut *audio,
            };
            let transition = menu.update(&mut frame, renderer, elapsed_seconds);
            let parent = menu.parent();
            self.last_used = Some(id);

            match transition {
                Some(MenuTransition::Open(child)) => self.set_visible(child, true),
                Some(MenuTransition::Back) => {
                    if let Some(parent) = parent {
                        self.set_visible(parent, true);
                    }
                }
                None => {}
            }
        }
    }
}
