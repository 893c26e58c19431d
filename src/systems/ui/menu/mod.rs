//! Frame-driven hierarchical menus.
//!
//! A [`Menu`] is an ordered list of [`Item`]s with a selection cursor, a
//! scroll window and a palette. Menus hold no timers of their own: the owning
//! [`MenuPool`] calls [`Menu::update`] once per frame for every visible menu,
//! handing it the shared input gate, an input snapshot, an audio sink and a
//! renderer. Navigation, drawing and callback dispatch all happen inside that
//! single call, in a fixed order.
//!
//! Invalid requests (unknown items, out-of-range indices, empty lists) are
//! absorbed by clamping or ignoring them; nothing here fails.
use bevy::prelude::*;

use crate::systems::{
    colors::{MenuTheme, RowColors},
    interaction::{Direction, FrameEdges, FrameInput, MenuAction},
    ui::{
        menu_surface::{FontStyle, Justification, Renderer, TextRun, WrapBounds},
        scroll::{linear_map_index, scroll_bar_target, ScrollAnimator},
    },
};

pub mod binding;
pub mod defs;
pub mod events;
pub mod layout;
pub mod menu_input;
pub mod pool;
pub mod schema;
pub mod scroll_adapter;
pub mod value_controls;
#[cfg(test)]
mod flow_tests;

pub use binding::BindingTable;
pub use defs::{Item, ItemId, ItemKind, ItemValue, ListCycler};
pub use events::{ListenerId, MenuListeners};
pub use layout::{MenuGeometry, MenuLayout};
pub use menu_input::{InputBindings, MenuSystems};
pub use pool::{MenuId, MenuPool};
pub use scroll_adapter::ScrollWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuMode {
    #[default]
    Interactive,
    /// Drawn every frame but never reads input. The cursor only moves through
    /// the explicit `go_to_*` operations.
    DisplayOnly,
}

/// Visibility change requested by a menu during its frame, applied by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTransition {
    Open(MenuId),
    Back,
}

#[derive(Debug)]
pub struct Menu {
    title: String,
    items: Vec<Item>,
    disabled: Vec<Item>,
    selected: usize,
    window: ScrollWindow,
    layout: MenuLayout,
    geometry: MenuGeometry,
    theme: MenuTheme,
    mode: MenuMode,
    visible: bool,
    event_dispatch: bool,
    parent: Option<MenuId>,
    parent_item: Option<ItemId>,
    bindings: BindingTable,
    listeners: MenuListeners,
    scroll: ScrollAnimator,
    edges: FrameEdges,
    next_item_id: u32,
    disposed: bool,
}

impl Menu {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_layout(title, MenuLayout::default())
    }

    pub fn display_only(title: impl Into<String>) -> Self {
        let mut menu = Self::with_layout(title, MenuLayout::display_only());
        menu.mode = MenuMode::DisplayOnly;
        menu
    }

    pub fn with_layout(title: impl Into<String>, layout: MenuLayout) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            disabled: Vec::new(),
            selected: 0,
            window: ScrollWindow::default(),
            geometry: MenuGeometry::default(),
            layout,
            theme: MenuTheme::default(),
            mode: MenuMode::Interactive,
            visible: false,
            event_dispatch: true,
            parent: None,
            parent_item: None,
            bindings: BindingTable::default(),
            listeners: MenuListeners::default(),
            scroll: ScrollAnimator::default(),
            edges: FrameEdges::default(),
            next_item_id: 0,
            disposed: false,
        }
    }

    pub fn with_theme(mut self, theme: MenuTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn mode(&self) -> MenuMode {
        self.mode
    }

    pub fn layout(&self) -> &MenuLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: MenuLayout) {
        let aspect_ratio = self.geometry.aspect_ratio;
        self.layout = layout;
        self.geometry = MenuGeometry::default();
        if aspect_ratio > 0.0 {
            self.sync_geometry(aspect_ratio);
        }
        self.clamp_index_position();
    }

    /// Geometry resolved during the last visible frame.
    pub fn geometry(&self) -> &MenuGeometry {
        &self.geometry
    }

    pub fn theme(&self) -> &MenuTheme {
        &self.theme
    }

    pub fn apply_color_scheme(&mut self, theme: MenuTheme) {
        self.theme = theme;
    }

    pub fn is_event_dispatch_enabled(&self) -> bool {
        self.event_dispatch
    }

    /// With dispatch disabled the menu still navigates and records edges for
    /// value controls, but select and left/right listeners are not fired.
    pub fn set_event_dispatch(&mut self, enabled: bool) {
        self.event_dispatch = enabled;
    }

    pub fn parent(&self) -> Option<MenuId> {
        self.parent
    }

    pub fn parent_item(&self) -> Option<ItemId> {
        self.parent_item
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn listeners_mut(&mut self) -> &mut MenuListeners {
        &mut self.listeners
    }

    pub fn listeners(&self) -> &MenuListeners {
        &self.listeners
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Edges accepted during the current frame.
    pub fn edges(&self) -> &FrameEdges {
        &self.edges
    }

    pub fn scroll_position(&self) -> f32 {
        self.scroll.position()
    }

    // ---------------------------------------------------------------------
    // Visibility
    // ---------------------------------------------------------------------

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Showing a hidden menu re-validates its cursor and window, then fires
    /// the open listeners. Hiding keeps cursor and window for the next open.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        if visible && self.disposed {
            warn!("ignoring request to show disposed menu `{}`", self.title);
            return;
        }

        self.visible = visible;
        if visible {
            self.clamp_index_position();
            debug!("menu `{}` opened", self.title);
            self.dispatch_open();
        } else {
            debug!("menu `{}` closed", self.title);
        }
    }

    // ---------------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------------

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn disabled_items(&self) -> &[Item] {
        &self.disabled
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends `item`, tagging it with its insertion position.
    pub fn add_item(&mut self, mut item: Item) -> ItemId {
        let id = ItemId::from_raw(self.next_item_id);
        self.next_item_id = self.next_item_id.wrapping_add(1);
        item.id = id;
        item.persistent_index = self.items.len();
        self.items.push(item);
        self.clamp_index_position();
        id
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Looks the item up among active and disabled items.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items
            .iter()
            .chain(self.disabled.iter())
            .find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items
            .iter_mut()
            .chain(self.disabled.iter_mut())
            .find(|item| item.id == id)
    }

    pub fn contains_item(&self, id: ItemId) -> bool {
        self.item(id).is_some()
    }

    pub fn disable_item(&mut self, id: ItemId) -> bool {
        let Some(index) = self.index_of(id) else {
            warn!("menu `{}`: cannot disable unknown item {id:?}", self.title);
            return false;
        };
        let item = self.items.remove(index);
        self.disabled.push(item);
        self.clamp_index_position();
        true
    }

    /// Moves a disabled item back to the end of the active list.
    pub fn reenable_item(&mut self, id: ItemId) -> bool {
        let Some(index) = self.disabled.iter().position(|item| item.id == id) else {
            warn!("menu `{}`: cannot re-enable item {id:?}, it is not disabled", self.title);
            return false;
        };
        let item = self.disabled.remove(index);
        self.items.push(item);
        self.clamp_index_position();
        true
    }

    pub fn reenable_all(&mut self) {
        self.items.append(&mut self.disabled);
        self.clamp_index_position();
    }

    /// Renumbers every active item's persistent index to its current position.
    pub fn reset_original_order(&mut self) {
        for (position, item) in self.items.iter_mut().enumerate() {
            item.persistent_index = position;
        }
    }

    /// Restores persistent-index order. The cursor stays on the same item.
    pub fn sort_by_original_order(&mut self) {
        let selected = self.selected_item().map(Item::id);
        self.items.sort_by_key(Item::persistent_index);
        if let Some(index) = selected.and_then(|id| self.index_of(id)) {
            self.selected = index;
        }
        self.clamp_index_position();
    }

    // ---------------------------------------------------------------------
    // Cursor and scroll window
    // ---------------------------------------------------------------------

    /// Cursor position, `None` while the menu has no active items.
    pub fn selected_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.selected)
    }

    pub fn selected_item_mut(&mut self) -> Option<&mut Item> {
        self.items.get_mut(self.selected)
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected_item().is_some_and(|item| item.id == id)
    }

    pub fn window(&self) -> ScrollWindow {
        self.window
    }

    pub fn max_visible(&self) -> usize {
        self.layout.max_visible
    }

    pub fn set_max_visible(&mut self, max_visible: usize) {
        self.layout.max_visible = max_visible.max(1);
        self.window = ScrollWindow::containing(self.selected, self.items.len(), self.max_visible());
    }

    pub fn is_scrolling(&self) -> bool {
        self.layout.use_scroll && self.items.len() > self.layout.max_visible
    }

    pub fn reset_index_position(&mut self) {
        self.selected = 0;
        self.window = ScrollWindow::top(self.items.len(), self.max_visible());
    }

    /// Jumps the cursor to `index`; out-of-range indices are ignored.
    pub fn set_index_position(&mut self, index: usize) {
        if index >= self.items.len() {
            warn!(
                "menu `{}`: index {index} is out of range for {} items",
                self.title,
                self.items.len()
            );
            return;
        }
        self.selected = index;
        self.window = ScrollWindow::containing(index, self.items.len(), self.max_visible());
    }

    /// Pulls cursor and window back inside the active list after a mutation.
    pub fn clamp_index_position(&mut self) {
        let count = self.items.len();
        self.selected = self.selected.min(count.saturating_sub(1));
        self.window = self.window.fit(self.selected, count, self.max_visible());
    }

    pub fn move_down(&mut self) {
        let count = self.items.len();
        if count == 0 {
            return;
        }
        if self.selected + 1 >= count {
            self.selected = 0;
            self.window = ScrollWindow::top(count, self.max_visible());
            return;
        }
        self.selected += 1;
        if self.selected > self.window.max() {
            self.window.slide_down();
        }
    }

    pub fn move_up(&mut self) {
        let count = self.items.len();
        if count == 0 {
            return;
        }
        if self.selected == 0 {
            self.selected = count - 1;
            self.window = ScrollWindow::bottom(count, self.max_visible());
            return;
        }
        self.selected -= 1;
        if self.selected < self.window.min() {
            self.window.slide_up();
        }
    }

    pub fn go_to_next_item(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
            if self.selected > self.window.max() {
                self.window.slide_down();
            }
        }
    }

    pub fn go_to_previous_item(&mut self) {
        if self.selected > 0 && !self.items.is_empty() {
            self.selected -= 1;
            if self.selected < self.window.min() {
                self.window.slide_up();
            }
        }
    }

    pub fn go_to_first_item(&mut self) {
        self.reset_index_position();
    }

    pub fn go_to_last_item(&mut self) {
        if let Some(last) = self.items.len().checked_sub(1) {
            self.set_index_position(last);
        }
    }

    // ---------------------------------------------------------------------
    // Frame
    // ---------------------------------------------------------------------

    /// Clears the edges recorded during the previous frame.
    pub fn begin_frame(&mut self, fast_modifier_held: bool) {
        self.edges.reset(fast_modifier_held);
    }

    /// Runs one frame: draw, navigate, then dispatch. Returns the visibility
    /// change the pool should apply once this menu is done.
    pub fn update(
        &mut self,
        frame: &mut FrameInput<'_>,
        renderer: &mut dyn Renderer,
        elapsed_seconds: f32,
    ) -> Option<MenuTransition> {
        self.begin_frame(frame.fast_modifier_held());
        if !self.visible {
            return None;
        }
        self.sync_geometry(renderer.aspect_ratio());
        let interactive = self.mode == MenuMode::Interactive;

        if interactive {
            self.run_item_frame(self.selected, frame);
        }

        self.draw_header(renderer);
        for index in 0..self.items.len() {
            if self.layout.use_scroll && !self.window.contains(index) {
                continue;
            }
            let slot = if self.layout.use_scroll {
                linear_map_index(
                    index,
                    self.window.min(),
                    self.window.max(),
                    0,
                    self.window.len() - 1,
                )
            } else {
                index
            };
            self.draw_row(renderer, index, slot);
        }
        self.draw_description(renderer);
        self.draw_scroll_bar(renderer, elapsed_seconds);

        if !interactive {
            return None;
        }

        if self.edges.poll(frame, MenuAction::Up) {
            self.navigate_up(frame);
        }
        if self.edges.poll(frame, MenuAction::Down) {
            self.navigate_down(frame);
        }

        let current = self.selected_item().map(|item| (item.id, self.selected));

        if let Some((id, index)) = current {
            if let Some(child) = self.bindings.child_for(id) {
                if self.edges.poll(frame, MenuAction::Accept) {
                    debug!("menu `{}` opening submenu {child:?}", self.title);
                    self.set_visible(false);
                    frame.gate.rearm_transition();
                    if self.event_dispatch {
                        self.dispatch_selected(id, index);
                    }
                    return Some(MenuTransition::Open(child));
                }
            }
        }

        let mut transition = None;
        if self.edges.poll(frame, MenuAction::Cancel) {
            debug!("menu `{}` going back", self.title);
            self.set_visible(false);
            frame.gate.rearm_transition();
            transition = Some(MenuTransition::Back);
        }

        if let Some((id, index)) = current.filter(|_| self.visible) {
            let accepted = self.edges.poll(frame, MenuAction::Accept);
            self.edges.poll(frame, MenuAction::Left);
            self.edges.poll(frame, MenuAction::Right);

            if self.event_dispatch {
                if accepted {
                    self.dispatch_selected(id, index);
                }
                if let Some(direction) = self.edges.direction() {
                    self.dispatch_left_right(id, index, direction);
                }
            }
            self.dispatch_highlighted(id, index);
        }

        transition
    }

    fn navigate_up(&mut self, frame: &mut FrameInput<'_>) {
        self.move_up();
        let fast = frame.fast_modifier_held();
        frame.gate.rearm_navigation(fast);
    }

    fn navigate_down(&mut self, frame: &mut FrameInput<'_>) {
        self.move_down();
        let fast = frame.fast_modifier_held();
        frame.gate.rearm_navigation(fast);
    }

    /// Item-local handling for the selected row, run before any row is drawn
    /// so the highlight always follows a forced move.
    fn run_item_frame(&mut self, index: usize, frame: &mut FrameInput<'_>) {
        let (is_subsection, is_list) = match self.items.get(index) {
            Some(item) => (item.is_subsection(), item.list_cycler().is_some()),
            None => return,
        };

        if is_subsection {
            if frame.input.is_held(MenuAction::Up) {
                self.navigate_up(frame);
            } else {
                self.navigate_down(frame);
            }
            return;
        }

        if is_list {
            let direction = if self.edges.poll(frame, MenuAction::Left) {
                Some(Direction::Left)
            } else if self.edges.poll(frame, MenuAction::Right) {
                Some(Direction::Right)
            } else {
                None
            };
            if let (Some(direction), Some(list)) = (
                direction,
                self.items.get_mut(index).and_then(Item::list_cycler_mut),
            ) {
                list.cycle(direction);
            }
        }
    }

    fn sync_geometry(&mut self, aspect_ratio: f32) {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return;
        }
        if self.geometry.aspect_ratio != aspect_ratio {
            self.geometry = MenuGeometry::compute(&self.layout, aspect_ratio);
        }
    }

    // ---------------------------------------------------------------------
    // Drawing
    // ---------------------------------------------------------------------

    fn draw_header(&self, renderer: &mut dyn Renderer) {
        let geometry = &self.geometry;
        renderer.draw_rect(
            Vec2::new(geometry.box_center_x, geometry.title_box_y),
            Vec2::new(geometry.box_width, geometry.title_box_height),
            self.theme.title_background,
        );
        renderer.draw_text(&TextRun {
            content: &self.title,
            font: FontStyle::Title,
            scale: self.layout.title_scale,
            color: self.theme.title_text,
            position: Vec2::new(geometry.box_center_x, geometry.title_text_y),
            justification: Justification::Center,
            wrap: None,
        });
        renderer.draw_rect(
            Vec2::new(geometry.box_center_x, geometry.underline_y),
            Vec2::new(geometry.box_width, geometry.underline_height),
            self.theme.title_underline,
        );
    }

    fn row_colors(&self, index: usize, item: &Item) -> RowColors {
        if item.is_subsection() {
            self.theme.subsection
        } else if index == self.selected {
            self.theme.highlighted
        } else {
            self.theme.default
        }
    }

    fn draw_row(&self, renderer: &mut dyn Renderer, index: usize, slot: usize) {
        let Some(item) = self.items.get(index) else {
            return;
        };
        let geometry = &self.geometry;
        let colors = self.row_colors(index, item);
        let text_y = geometry.row_text_y(slot);

        renderer.draw_rect(geometry.row_center(slot), geometry.row_size(), colors.background);

        let (text_x, justification) = if item.is_subsection() {
            (geometry.box_center_x, Justification::Center)
        } else {
            (geometry.item_text_x, Justification::Left)
        };
        renderer.draw_text(&TextRun {
            content: item.text(),
            font: FontStyle::Body,
            scale: self.layout.item_scale,
            color: colors.text,
            position: Vec2::new(text_x, text_y),
            justification,
            wrap: None,
        });

        if let Some(label) = item.value_label() {
            renderer.draw_text(&TextRun {
                content: &label,
                font: FontStyle::Body,
                scale: self.layout.item_scale,
                color: colors.text,
                position: Vec2::new(geometry.item_value_x, text_y),
                justification: Justification::Right,
                wrap: Some(WrapBounds {
                    left: geometry.item_text_x,
                    right: geometry.item_value_x,
                }),
            });
        }
    }

    /// Description of the selected item, in the slots right below the list.
    fn draw_description(&self, renderer: &mut dyn Renderer) {
        let Some(description) = self.selected_item().and_then(Item::description) else {
            return;
        };
        let geometry = &self.geometry;
        let slot = if self.is_scrolling() {
            self.window.len()
        } else {
            self.items.len()
        };

        let width_px = renderer.measure_width(description, FontStyle::Body, self.layout.item_scale)
            * geometry.logical_width;
        let lines = geometry.description_lines(&self.layout, width_px);
        for line in 0..lines {
            renderer.draw_rect(
                geometry.row_center(slot + line),
                geometry.row_size(),
                self.theme.description.background,
            );
        }
        renderer.draw_text(&TextRun {
            content: description,
            font: FontStyle::Body,
            scale: self.layout.item_scale,
            color: self.theme.description.text,
            position: Vec2::new(geometry.item_text_x, geometry.row_text_y(slot)),
            justification: Justification::Left,
            wrap: Some(WrapBounds {
                left: geometry.item_text_x,
                right: geometry.description_text_right,
            }),
        });
    }

    fn draw_scroll_bar(&mut self, renderer: &mut dyn Renderer, elapsed_seconds: f32) {
        if !self.is_scrolling() {
            return;
        }
        let geometry = self.geometry;
        let top = geometry.item_box_y;
        let bottom = top + (self.window.len() - 1) as f32 * geometry.row_step;
        let target = scroll_bar_target(self.selected, self.items.len(), top, bottom);
        let y = self.scroll.step(target, elapsed_seconds, top, bottom);

        renderer.draw_rect(
            Vec2::new(geometry.scrollbar_x, y),
            Vec2::new(geometry.scrollbar_width, geometry.row_step),
            self.theme.scroll_bar(),
        );
    }

    // ---------------------------------------------------------------------
    // Dispatch
    // ---------------------------------------------------------------------

    // Listeners removed by an earlier callback of the same dispatch are
    // skipped; removals are applied to the list when it is put back.

    fn dispatch_open(&mut self) {
        let Some(mut listeners) = self.listeners.open.begin_dispatch() else {
            return;
        };
        for (id, listener) in listeners.iter_mut() {
            if !self.listeners.open.is_removed(id) {
                listener(self);
            }
        }
        self.listeners.open.finish_dispatch(listeners);
    }

    fn dispatch_highlighted(&mut self, item: ItemId, index: usize) {
        let Some(mut listeners) = self.listeners.highlighted.begin_dispatch() else {
            return;
        };
        for (id, listener) in listeners.iter_mut() {
            if !self.listeners.highlighted.is_removed(id) {
                listener(self, item, index);
            }
        }
        self.listeners.highlighted.finish_dispatch(listeners);
    }

    fn dispatch_selected(&mut self, item: ItemId, index: usize) {
        let Some(mut listeners) = self.listeners.selected.begin_dispatch() else {
            return;
        };
        for (id, listener) in listeners.iter_mut() {
            if !self.listeners.selected.is_removed(id) {
                listener(self, item, index);
            }
        }
        self.listeners.selected.finish_dispatch(listeners);
    }

    fn dispatch_left_right(&mut self, item: ItemId, index: usize, direction: Direction) {
        let Some(mut listeners) = self.listeners.left_right.begin_dispatch() else {
            return;
        };
        for (id, listener) in listeners.iter_mut() {
            if !self.listeners.left_right.is_removed(id) {
                listener(self, item, index, direction);
            }
        }
        self.listeners.left_right.finish_dispatch(listeners);
    }

    /// Drops listeners, bindings and the parent link, and hides the menu.
    /// Called by the pool, which also unlinks the menu from its relatives.
    fn release(&mut self) {
        self.visible = false;
        self.listeners.clear();
        self.bindings.clear();
        for item in self.items.iter_mut().chain(self.disabled.iter_mut()) {
            item.linked_submenu = None;
        }
        self.parent = None;
        self.parent_item = None;
        self.disposed = true;
    }
}
