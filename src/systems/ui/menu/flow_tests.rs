use std::sync::{Arc, Mutex};

use bevy::{color::Color, math::Vec2};

use crate::systems::{
    audio::MenuSound,
    interaction::{Direction, InputSnapshot, MenuAction, DEFAULT_TRANSITION_INTERVAL},
    ui::menu_surface::{DrawCommand, DrawList},
};

use super::{
    value_controls::control_bool, Item, ItemId, ItemValue, ListenerId, Menu, MenuId, MenuPool,
    ScrollWindow,
};

const FRAME: f32 = 1.0 / 60.0;

struct Harness {
    pool: MenuPool,
    audio: Vec<MenuSound>,
    renderer: DrawList,
}

impl Harness {
    fn new() -> Self {
        Self {
            pool: MenuPool::default(),
            audio: Vec::new(),
            renderer: DrawList::default(),
        }
    }

    fn frame(&mut self, input: &InputSnapshot) {
        self.renderer.clear();
        self.pool
            .tick(FRAME, input, &mut self.audio, &mut self.renderer);
    }

    /// Presses `action` for one frame after letting any cooldown run out.
    fn press(&mut self, action: MenuAction) {
        self.idle(30);
        self.frame(&InputSnapshot::new().with_held(action));
    }

    fn idle(&mut self, frames: usize) {
        for _ in 0..frames {
            self.frame(&InputSnapshot::new());
        }
    }

    fn menu(&self, id: MenuId) -> &Menu {
        self.pool.menu(id).expect("menu registered")
    }

    fn menu_mut(&mut self, id: MenuId) -> &mut Menu {
        self.pool.menu_mut(id).expect("menu registered")
    }
}

fn menu_with_items(title: &str, count: usize) -> Menu {
    let mut menu = Menu::new(title);
    for index in 0..count {
        menu.add_item(Item::plain(format!("{title} {index}")));
    }
    menu
}

#[test]
fn twenty_item_window_follows_cursor_and_wraps() {
    let mut harness = Harness::new();
    let id = harness.pool.register(menu_with_items("List", 20));
    harness.pool.set_visible(id, true);
    harness.menu_mut(id).set_index_position(14);

    harness.press(MenuAction::Down);
    assert_eq!(harness.menu(id).selected_index(), Some(15));
    assert_eq!(harness.menu(id).window(), ScrollWindow::new(1, 15));

    for _ in 0..4 {
        harness.press(MenuAction::Down);
    }
    assert_eq!(harness.menu(id).selected_index(), Some(19));
    assert_eq!(harness.menu(id).window(), ScrollWindow::new(5, 19));

    harness.press(MenuAction::Down);
    assert_eq!(harness.menu(id).selected_index(), Some(0));
    assert_eq!(harness.menu(id).window(), ScrollWindow::new(0, 14));
}

#[test]
fn only_window_rows_are_drawn() {
    let mut harness = Harness::new();
    let id = harness.pool.register(menu_with_items("Row", 20));
    harness.pool.set_visible(id, true);
    harness.menu_mut(id).set_index_position(19);
    harness.idle(1);

    let texts: Vec<&str> = harness.renderer.texts().collect();
    assert!(!texts.contains(&"Row 4"));
    assert!(texts.contains(&"Row 5"));
    assert!(texts.contains(&"Row 19"));
    assert_eq!(texts.iter().filter(|text| text.starts_with("Row ")).count(), 15);
}

#[test]
fn held_down_is_throttled_and_fast_modifier_repeats_sooner() {
    let mut harness = Harness::new();
    let id = harness.pool.register(menu_with_items("Hold", 10));
    harness.pool.set_visible(id, true);

    let held = InputSnapshot::new().with_held(MenuAction::Down);
    for _ in 0..5 {
        harness.frame(&held);
    }
    // 80 ms cooldown: one edge on the first frame, the next on frame six.
    assert_eq!(harness.menu(id).selected_index(), Some(1));

    harness.menu_mut(id).reset_index_position();
    harness.idle(30);
    let fast = InputSnapshot::new()
        .with_held(MenuAction::Down)
        .with_fast_modifier();
    // 20 ms cooldown: edges on frames one, three and five.
    for _ in 0..5 {
        harness.frame(&fast);
    }
    assert_eq!(harness.menu(id).selected_index(), Some(3));
}

#[test]
fn accept_on_bound_item_opens_child() {
    let mut harness = Harness::new();
    let parent = harness.pool.register(menu_with_items("Main", 2));
    let child = harness.pool.register(menu_with_items("Options", 3));
    let link = harness.menu_mut(parent).add_item(Item::plain("Options"));
    assert!(harness.pool.bind(parent, child, link));
    harness.pool.set_visible(parent, true);

    let selected: Arc<Mutex<Vec<(ItemId, usize)>>> = Arc::default();
    let sink = selected.clone();
    harness
        .menu_mut(parent)
        .listeners_mut()
        .on_selected(move |_, item, index| {
            if let Ok(mut seen) = sink.lock() {
                seen.push((item, index));
            }
        });

    harness.menu_mut(parent).set_index_position(2);
    harness.audio.clear();
    harness.press(MenuAction::Accept);

    assert!(!harness.menu(parent).is_visible());
    assert!(harness.menu(child).is_visible());
    assert_eq!(harness.menu(child).parent(), Some(parent));
    assert_eq!(harness.menu(child).parent_item(), Some(link));
    assert_eq!(harness.audio, vec![MenuSound::Select]);
    assert_eq!(
        selected.lock().map(|seen| seen.clone()).unwrap_or_default(),
        vec![(link, 2)]
    );
    assert_eq!(
        harness.pool.gate().deadline(),
        harness.pool.gate().now() + DEFAULT_TRANSITION_INTERVAL
    );
}

#[test]
fn cancel_returns_to_parent_and_is_no_op_at_root() {
    let mut harness = Harness::new();
    let root = harness.pool.register(menu_with_items("Root", 1));
    let (child, _) = harness
        .pool
        .add_submenu(menu_with_items("Audio", 2), root, "Audio", Some("Sound levels"), true)
        .expect("root exists");
    harness.pool.set_visible(child, true);

    harness.press(MenuAction::Cancel);
    assert!(!harness.menu(child).is_visible());
    assert!(harness.menu(root).is_visible());

    harness.press(MenuAction::Cancel);
    assert!(!harness.pool.is_any_open());
    assert_eq!(
        harness.audio.iter().filter(|cue| **cue == MenuSound::Back).count(),
        2
    );
}

#[test]
fn submenu_link_carries_indicator_and_theme() {
    let mut harness = Harness::new();
    let root = harness.pool.register(Menu::new("Root"));
    let mut theme = *harness.menu(root).theme();
    theme.title_text = bevy::color::Color::srgb(1.0, 0.0, 0.0);
    harness.menu_mut(root).apply_color_scheme(theme);

    let (child, link) = harness
        .pool
        .add_submenu(Menu::new("Video"), root, "Video", None, true)
        .expect("root exists");

    let item = harness.menu(root).item(link).expect("link added");
    assert_eq!(item.text(), "Video  >");
    assert_eq!(item.linked_submenu(), Some(child));
    assert_eq!(harness.menu(child).theme(), &theme);
    assert_eq!(harness.menu(root).bindings().child_for(link), Some(child));
}

#[test]
fn toggle_flips_backing_value_on_accept() {
    let mut harness = Harness::new();
    let mut menu = Menu::new("Display");
    let toggle = menu.add_item(Item::toggle("Fullscreen", false));
    let id = harness.pool.register(menu);
    harness.pool.set_visible(id, true);

    let mut fullscreen = false;
    harness.press(MenuAction::Accept);
    assert!(control_bool(harness.menu_mut(id), toggle, &mut fullscreen));
    assert!(fullscreen);
    assert_eq!(
        harness.menu(id).item(toggle).map(Item::value),
        Some(&ItemValue::Bool(true))
    );

    harness.idle(1);
    assert!(!control_bool(harness.menu_mut(id), toggle, &mut fullscreen));
    assert!(fullscreen);
}

#[test]
fn toggle_listener_updates_value_within_the_frame() {
    let mut harness = Harness::new();
    let mut menu = Menu::new("Display");
    let toggle = menu.add_item(Item::toggle("Vsync", false));
    let backing = Arc::new(Mutex::new(false));
    let shared = backing.clone();
    menu.listeners_mut().on_selected(move |menu, item, _| {
        if let Ok(mut value) = shared.lock() {
            control_bool(menu, item, &mut *value);
        }
    });
    let id = harness.pool.register(menu);
    harness.pool.set_visible(id, true);

    harness.press(MenuAction::Accept);
    assert_eq!(backing.lock().map(|value| *value).ok(), Some(true));
    assert_eq!(
        harness.menu(id).item(toggle).and_then(Item::value_label).as_deref(),
        Some("On")
    );
}

#[test]
fn list_cycler_wraps_and_reports_left_right() {
    let mut harness = Harness::new();
    let mut menu = Menu::new("Game");
    let list = menu.add_item(Item::list("Difficulty", ["Easy", "Normal", "Hard"], 0));
    let directions: Arc<Mutex<Vec<Direction>>> = Arc::default();
    let sink = directions.clone();
    menu.listeners_mut().on_left_right(move |_, _, _, direction| {
        if let Ok(mut seen) = sink.lock() {
            seen.push(direction);
        }
    });
    let id = harness.pool.register(menu);
    harness.pool.set_visible(id, true);

    harness.press(MenuAction::Left);
    let cycler = |harness: &Harness| {
        harness
            .menu(id)
            .item(list)
            .and_then(Item::list_cycler)
            .map(|list| list.index())
    };
    assert_eq!(cycler(&harness), Some(2));

    for _ in 0..3 {
        harness.press(MenuAction::Right);
    }
    assert_eq!(cycler(&harness), Some(2));
    assert_eq!(
        harness.audio,
        vec![MenuSound::Navigate; 4],
        "one cue per accepted edge"
    );
    assert_eq!(
        directions.lock().map(|seen| seen.clone()).unwrap_or_default(),
        vec![
            Direction::Left,
            Direction::Right,
            Direction::Right,
            Direction::Right
        ]
    );
    assert!(harness.renderer.texts().any(|text| text == "< Hard >"));
}

#[test]
fn subsection_header_is_skipped_in_travel_direction() {
    let mut harness = Harness::new();
    let mut menu = Menu::new("Settings");
    menu.add_item(Item::plain("Play"));
    menu.add_item(Item::subsection("Graphics"));
    menu.add_item(Item::plain("Resolution"));
    let id = harness.pool.register(menu);
    harness.pool.set_visible(id, true);

    harness.press(MenuAction::Down);
    assert_eq!(harness.menu(id).selected_index(), Some(1));
    harness.idle(1);
    assert_eq!(harness.menu(id).selected_index(), Some(2));

    harness.idle(30);
    let up = InputSnapshot::new().with_held(MenuAction::Up);
    harness.frame(&up);
    assert_eq!(harness.menu(id).selected_index(), Some(1));
    harness.frame(&up);
    assert_eq!(harness.menu(id).selected_index(), Some(0));
}

#[test]
fn highlight_fires_every_visible_frame() {
    let mut harness = Harness::new();
    let mut menu = menu_with_items("Main", 3);
    let count = Arc::new(Mutex::new(0usize));
    let sink = count.clone();
    menu.listeners_mut().on_highlighted(move |_, _, index| {
        assert_eq!(index, 0);
        if let Ok(mut seen) = sink.lock() {
            *seen += 1;
        }
    });
    let id = harness.pool.register(menu);
    harness.idle(2);
    harness.pool.set_visible(id, true);
    harness.idle(5);

    assert_eq!(count.lock().map(|seen| *seen).ok(), Some(5));
}

#[test]
fn disabled_dispatch_still_navigates_but_skips_select() {
    let mut harness = Harness::new();
    let mut menu = menu_with_items("Quiet", 2);
    menu.set_event_dispatch(false);
    let fired = Arc::new(Mutex::new(false));
    let sink = fired.clone();
    menu.listeners_mut().on_selected(move |_, _, _| {
        if let Ok(mut fired) = sink.lock() {
            *fired = true;
        }
    });
    let id = harness.pool.register(menu);
    harness.pool.set_visible(id, true);

    harness.press(MenuAction::Down);
    harness.press(MenuAction::Accept);
    assert_eq!(harness.menu(id).selected_index(), Some(1));
    assert!(harness.menu(id).edges().pressed(MenuAction::Accept));
    assert_eq!(fired.lock().map(|fired| *fired).ok(), Some(false));
}

#[test]
fn close_all_and_toggle_follow_last_used_menu() {
    let mut harness = Harness::new();
    let first = harness.pool.register(menu_with_items("First", 1));
    let second = harness.pool.register(menu_with_items("Second", 1));
    harness.pool.set_visible(second, true);
    harness.idle(1);
    assert_eq!(harness.pool.last_used(), Some(second));

    harness.pool.toggle_last_or_close_any();
    assert!(!harness.pool.is_any_open());
    harness.pool.toggle_last_or_close_any();
    assert!(harness.menu(second).is_visible());
    assert!(!harness.menu(first).is_visible());
}

#[test]
fn display_only_menu_draws_but_ignores_input() {
    let mut harness = Harness::new();
    let mut credits = Menu::display_only("Credits");
    for index in 0..12 {
        credits.add_item(Item::plain(format!("Line {index}")));
    }
    let id = harness.pool.register(credits);
    harness.pool.set_visible(id, true);

    harness.press(MenuAction::Down);
    harness.press(MenuAction::Cancel);
    assert!(harness.menu(id).is_visible());
    assert_eq!(harness.menu(id).selected_index(), Some(0));
    assert!(harness.audio.is_empty());
    assert!(harness.renderer.texts().any(|text| text == "Credits"));

    harness.menu_mut(id).go_to_last_item();
    assert_eq!(harness.menu(id).window(), ScrollWindow::new(4, 11));
}

#[test]
fn description_is_drawn_below_the_last_row() {
    let mut harness = Harness::new();
    let mut menu = Menu::new("Help");
    menu.add_item(Item::plain("Play").with_description("Start a new game"));
    menu.add_item(Item::plain("Quit"));
    let id = harness.pool.register(menu);
    harness.pool.set_visible(id, true);
    harness.idle(1);

    assert!(harness.renderer.texts().any(|text| text == "Start a new game"));
    // title box, underline, two rows and one description row
    assert_eq!(harness.renderer.rect_count(), 5);
}

#[test]
fn scroll_bar_converges_on_selected_row() {
    let mut harness = Harness::new();
    let id = harness.pool.register(menu_with_items("Long", 30));
    harness.pool.set_visible(id, true);
    harness.idle(1);
    let top = harness.menu(id).scroll_position();

    harness.menu_mut(id).go_to_last_item();
    harness.idle(240);
    let geometry = *harness.menu(id).geometry();
    let bottom = geometry.item_box_y + 14.0 * geometry.row_step;
    assert!((harness.menu(id).scroll_position() - bottom).abs() < 1e-3);
    assert!(harness.menu(id).scroll_position() > top);
}

#[test]
fn dispose_breaks_parent_child_links() {
    let mut harness = Harness::new();
    let root = harness.pool.register(menu_with_items("Root", 1));
    let (child, link) = harness
        .pool
        .add_submenu(menu_with_items("Child", 1), root, "Child", None, false)
        .expect("root exists");
    let (grandchild, _) = harness
        .pool
        .add_submenu(menu_with_items("Leaf", 1), child, "Leaf", None, false)
        .expect("child exists");
    harness
        .menu_mut(child)
        .listeners_mut()
        .on_open(|_| {});

    harness.pool.dispose(child);

    assert!(harness.menu(child).is_disposed());
    assert!(harness.menu(child).listeners().is_empty());
    assert!(harness.menu(child).bindings().is_empty());
    assert_eq!(harness.menu(child).parent(), None);
    assert_eq!(harness.menu(grandchild).parent(), None);
    assert_eq!(harness.menu(root).bindings().child_for(link), None);
    assert_eq!(
        harness.menu(root).item(link).and_then(Item::linked_submenu),
        None
    );

    harness.pool.set_visible(child, true);
    assert!(!harness.menu(child).is_visible());
}

/// Text runs whose content is `prefix` followed by a row number.
fn text_runs<'a>(
    renderer: &'a DrawList,
    prefix: &'a str,
) -> impl Iterator<Item = (usize, Vec2, Color)> + 'a {
    renderer.commands().iter().filter_map(move |command| match command {
        DrawCommand::Text {
            content,
            position,
            color,
            ..
        } => content
            .strip_prefix(prefix)
            .and_then(|index| index.parse().ok())
            .map(|index| (index, *position, *color)),
        DrawCommand::Rect { .. } => None,
    })
}

#[test]
fn every_window_row_gets_its_own_slot() {
    for (count, max_visible, selected) in [(30, 23, 29), (23, 30, 0), (50, 44, 49), (40, 40, 0)] {
        let mut harness = Harness::new();
        let mut menu = menu_with_items("Row", count);
        menu.set_max_visible(max_visible);
        let id = harness.pool.register(menu);
        harness.pool.set_visible(id, true);
        harness.menu_mut(id).set_index_position(selected);
        harness.idle(1);

        let window = harness.menu(id).window();
        let geometry = *harness.menu(id).geometry();
        let mut drawn = 0;
        for (index, position, _) in text_runs(&harness.renderer, "Row ") {
            let expected = geometry.row_text_y(index - window.min());
            assert!(
                (position.y - expected).abs() < 1e-6,
                "row {index} of {count} drawn at {} instead of {expected}",
                position.y
            );
            drawn += 1;
        }
        assert_eq!(drawn, count.min(max_visible));
    }
}

#[test]
fn selected_listener_can_clear_listeners_for_good() {
    let mut harness = Harness::new();
    let mut menu = menu_with_items("Once", 2);
    let fired = Arc::new(Mutex::new(0usize));
    for _ in 0..2 {
        let sink = fired.clone();
        menu.listeners_mut().on_selected(move |menu, _, _| {
            if let Ok(mut fired) = sink.lock() {
                *fired += 1;
            }
            menu.listeners_mut().clear();
        });
    }
    let id = harness.pool.register(menu);
    harness.pool.set_visible(id, true);

    harness.press(MenuAction::Accept);
    harness.press(MenuAction::Accept);
    assert_eq!(fired.lock().map(|fired| *fired).ok(), Some(1));
    assert!(harness.menu(id).listeners().is_empty());
}

#[test]
fn selected_listener_can_unsubscribe_itself() {
    let mut harness = Harness::new();
    let mut menu = menu_with_items("Once", 2);
    let fired = Arc::new(Mutex::new(Vec::new()));
    let own_id: Arc<Mutex<Option<ListenerId>>> = Arc::default();

    let sink = fired.clone();
    let handle = own_id.clone();
    let one_shot = menu.listeners_mut().on_selected(move |menu, _, _| {
        if let Ok(mut fired) = sink.lock() {
            fired.push("one-shot");
        }
        if let Some(id) = handle.lock().ok().and_then(|id| *id) {
            menu.listeners_mut().unsubscribe(id);
        }
    });
    if let Ok(mut id) = own_id.lock() {
        *id = Some(one_shot);
    }
    let sink = fired.clone();
    menu.listeners_mut().on_selected(move |_, _, _| {
        if let Ok(mut fired) = sink.lock() {
            fired.push("steady");
        }
    });
    let id = harness.pool.register(menu);
    harness.pool.set_visible(id, true);

    harness.press(MenuAction::Accept);
    harness.press(MenuAction::Accept);
    assert_eq!(
        fired.lock().map(|fired| fired.clone()).unwrap_or_default(),
        vec!["one-shot", "steady", "steady"]
    );
    assert_eq!(harness.menu(id).listeners().selected.len(), 1);
}

#[test]
fn upward_subsection_skip_keeps_a_highlighted_row() {
    let mut harness = Harness::new();
    let mut menu = Menu::new("Settings");
    menu.add_item(Item::plain("Row 0"));
    menu.add_item(Item::subsection("Graphics"));
    menu.add_item(Item::plain("Row 2"));
    let id = harness.pool.register(menu);
    harness.pool.set_visible(id, true);
    harness.menu_mut(id).set_index_position(2);

    harness.idle(30);
    let up = InputSnapshot::new().with_held(MenuAction::Up);
    harness.frame(&up);
    assert_eq!(harness.menu(id).selected_index(), Some(1));
    harness.frame(&up);
    assert_eq!(harness.menu(id).selected_index(), Some(0));

    let highlight = harness.menu(id).theme().highlighted.text;
    let highlighted: Vec<usize> = text_runs(&harness.renderer, "Row ")
        .filter(|(_, _, color)| *color == highlight)
        .map(|(index, _, _)| index)
        .collect();
    assert_eq!(highlighted, vec![0]);
}
