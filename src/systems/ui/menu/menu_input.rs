//! Bevy-facing input resolution and the per-frame pool tick.
use bevy::prelude::*;
use enum_map::{enum_map, EnumMap};
use smallvec::{smallvec, SmallVec};

use crate::systems::{
    audio::CueQueue,
    interaction::{InputSnapshot, MenuAction},
    ui::menu_surface::DrawList,
};

use super::MenuPool;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum MenuSystems {
    Input,
    Tick,
    Output,
}

/// Physical controls resolving to one logical action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionBinding {
    pub keys: SmallVec<[KeyCode; 4]>,
    pub buttons: SmallVec<[GamepadButton; 2]>,
}

impl ActionBinding {
    fn new(keys: &[KeyCode], buttons: &[GamepadButton]) -> Self {
        Self {
            keys: SmallVec::from_slice(keys),
            buttons: SmallVec::from_slice(buttons),
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct InputBindings {
    pub actions: EnumMap<MenuAction, ActionBinding>,
    pub fast_keys: SmallVec<[KeyCode; 2]>,
    pub fast_buttons: SmallVec<[GamepadButton; 2]>,
    /// Opens the last used menu or closes every open one.
    pub toggle_key: KeyCode,
}

impl Default for InputBindings {
    fn default() -> Self {
        use GamepadButton as Pad;
        use KeyCode as Key;

        Self {
            actions: enum_map! {
                MenuAction::Up => ActionBinding::new(&[Key::ArrowUp, Key::Numpad8], &[Pad::DPadUp]),
                MenuAction::Down => ActionBinding::new(&[Key::ArrowDown, Key::Numpad2], &[Pad::DPadDown]),
                MenuAction::Left => ActionBinding::new(&[Key::ArrowLeft, Key::Numpad4], &[Pad::DPadLeft]),
                MenuAction::Right => ActionBinding::new(&[Key::ArrowRight, Key::Numpad6], &[Pad::DPadRight]),
                MenuAction::Accept => ActionBinding::new(&[Key::Enter, Key::Numpad5], &[Pad::South]),
                MenuAction::Cancel => ActionBinding::new(&[Key::Backspace, Key::Numpad0], &[Pad::East]),
            },
            fast_keys: smallvec![Key::ShiftLeft, Key::ShiftRight],
            fast_buttons: smallvec![Pad::RightTrigger],
            toggle_key: Key::F9,
        }
    }
}

/// Which device the player touched last. Gamepad bindings are only polled
/// while this is [`LastInputMethod::Gamepad`].
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastInputMethod {
    #[default]
    Keyboard,
    Gamepad,
}

pub fn track_last_input_method(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut method: ResMut<LastInputMethod>,
) {
    if keyboard.get_just_pressed().next().is_some() {
        method.set_if_neq(LastInputMethod::Keyboard);
    } else if gamepads
        .iter()
        .any(|gamepad| gamepad.get_just_pressed().next().is_some())
    {
        method.set_if_neq(LastInputMethod::Gamepad);
    }
}

pub fn build_input_snapshot(
    bindings: &InputBindings,
    method: LastInputMethod,
    keyboard: &ButtonInput<KeyCode>,
    gamepads: &[&Gamepad],
) -> InputSnapshot {
    let use_gamepad = method == LastInputMethod::Gamepad;
    let pad_held = |buttons: &[GamepadButton]| {
        use_gamepad
            && gamepads
                .iter()
                .any(|gamepad| buttons.iter().any(|button| gamepad.pressed(*button)))
    };

    let mut snapshot = InputSnapshot::new();
    for (action, binding) in bindings.actions.iter() {
        let held = keyboard.any_pressed(binding.keys.iter().copied()) || pad_held(&binding.buttons);
        snapshot.set_held(action, held);
    }
    snapshot.set_fast_modifier(
        keyboard.any_pressed(bindings.fast_keys.iter().copied()) || pad_held(&bindings.fast_buttons),
    );
    snapshot.set_gamepad(use_gamepad);
    snapshot
}

#[allow(clippy::too_many_arguments)]
pub fn tick_menu_pool(
    time: Res<Time>,
    bindings: Res<InputBindings>,
    method: Res<LastInputMethod>,
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut pool: ResMut<MenuPool>,
    mut cues: ResMut<CueQueue>,
    mut draw_list: ResMut<DrawList>,
) {
    let gamepads: SmallVec<[&Gamepad; 4]> = gamepads.iter().collect();
    let snapshot = build_input_snapshot(&bindings, *method, &keyboard, &gamepads);
    draw_list.clear();
    pool.tick(time.delta_secs(), &snapshot, &mut *cues, &mut *draw_list);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{
        audio::MenuSound,
        interaction::InputSource,
        ui::menu::{Item, Menu},
    };

    fn menu_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<InputBindings>()
            .init_resource::<LastInputMethod>()
            .init_resource::<MenuPool>()
            .init_resource::<CueQueue>()
            .init_resource::<DrawList>()
            .add_systems(
                Update,
                (track_last_input_method, tick_menu_pool).chain(),
            );
        app
    }

    #[test]
    fn keyboard_bindings_resolve_to_actions() {
        let bindings = InputBindings::default();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::Numpad2);
        keyboard.press(KeyCode::ShiftLeft);

        let snapshot = build_input_snapshot(
            &bindings,
            LastInputMethod::Keyboard,
            &keyboard,
            &[],
        );
        assert!(snapshot.is_held(MenuAction::Down));
        assert!(!snapshot.is_held(MenuAction::Up));
        assert!(snapshot.is_fast_modifier_held());
        assert!(!snapshot.is_gamepad());
    }

    #[test]
    fn tick_system_navigates_visible_menu() {
        let mut app = menu_app();
        let id = {
            let mut pool = app.world_mut().resource_mut::<MenuPool>();
            let mut menu = Menu::new("Main");
            menu.add_item(Item::plain("Play"));
            menu.add_item(Item::plain("Quit"));
            let id = pool.register(menu);
            pool.set_visible(id, true);
            id
        };

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowDown);
        app.update();

        let pool = app.world().resource::<MenuPool>();
        assert_eq!(pool.menu(id).and_then(Menu::selected_index), Some(1));
        assert_eq!(
            app.world().resource::<CueQueue>().pending(),
            &[MenuSound::Navigate]
        );
        assert!(app.world().resource::<DrawList>().texts().any(|text| text == "Quit"));
        assert_eq!(
            *app.world().resource::<LastInputMethod>(),
            LastInputMethod::Keyboard
        );
    }
}
