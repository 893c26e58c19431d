use bevy::prelude::*;

use crate::systems::ui::menu::{InputBindings, MenuPool};

/// Opens the last used menu, or closes every menu when any is open.
pub fn toggle_menus(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    mut pool: ResMut<MenuPool>,
) {
    if keyboard_input.just_pressed(bindings.toggle_key) {
        pool.toggle_last_or_close_any();
    }
}
