//! Mirrors the menu draw list into window-space sprites and text.
use bevy::{
    color::palettes::css::BLACK,
    prelude::*,
    sprite::Anchor,
    text::TextBounds,
    window::PrimaryWindow,
};

use crate::systems::ui::menu::MenuSystems;
use crate::systems::ui::menu_surface::{
    DrawCommand, DrawList, Justification, FONT_PX_PER_SCALE, REFERENCE_HEIGHT,
};

/// Base depth of menu entities; later commands stack on top of earlier ones.
const MENU_Z: f32 = 100.0;
const MENU_Z_STEP: f32 = 0.001;

pub struct RenderPlugin {
    pub spawn_camera: bool,
}

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrawList>()
            .add_systems(
                Update,
                track_window_aspect.in_set(MenuSystems::Input),
            )
            .add_systems(Update, sync_draw_list.in_set(MenuSystems::Output));
        if self.spawn_camera {
            app.add_systems(Startup, setup_camera);
        }
    }
}

#[derive(Component)]
pub struct MainCamera;

/// Entity spawned from the current frame's draw list.
#[derive(Component)]
pub struct MenuDrawn;

pub fn setup_camera(mut commands: Commands, mut clear_color: ResMut<ClearColor>) {
    clear_color.0 = BLACK.into();
    commands.spawn((Camera2d, MainCamera));
}

pub fn track_window_aspect(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut draw_list: ResMut<DrawList>,
) {
    for window in &windows {
        let height = window.height();
        if height > 0.0 {
            draw_list.set_aspect_ratio(window.width() / height);
        }
    }
}

/// Screen fraction (origin top-left, y down) to world position for a
/// centered 2d camera.
pub fn to_world(position: Vec2, window_size: Vec2) -> Vec2 {
    Vec2::new(
        (position.x - 0.5) * window_size.x,
        (0.5 - position.y) * window_size.y,
    )
}

fn text_anchor(justification: Justification) -> (Anchor, Justify) {
    match justification {
        Justification::Left => (Anchor::TOP_LEFT, Justify::Left),
        Justification::Center => (Anchor::TOP_CENTER, Justify::Center),
        Justification::Right => (Anchor::TOP_RIGHT, Justify::Right),
    }
}

/// Rebuilds the menu entities whenever the draw list changed.
pub fn sync_draw_list(
    mut commands: Commands,
    draw_list: Res<DrawList>,
    drawn: Query<Entity, With<MenuDrawn>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    if !draw_list.is_changed() {
        return;
    }
    for entity in &drawn {
        commands.entity(entity).despawn();
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let window_size = Vec2::new(window.width(), window.height());
    let pixel_scale = window_size.y / REFERENCE_HEIGHT;

    for (order, command) in draw_list.commands().iter().enumerate() {
        let z = MENU_Z + order as f32 * MENU_Z_STEP;
        match command {
            DrawCommand::Rect { center, size, color } => {
                commands.spawn((
                    MenuDrawn,
                    Sprite::from_color(*color, *size * window_size),
                    Transform::from_translation(to_world(*center, window_size).extend(z)),
                ));
            }
            DrawCommand::Text {
                content,
                scale,
                color,
                position,
                justification,
                wrap,
                ..
            } => {
                let (anchor, justify) = text_anchor(*justification);
                let mut text = commands.spawn((
                    MenuDrawn,
                    Text2d::new(content.clone()),
                    TextFont {
                        font_size: scale * FONT_PX_PER_SCALE * pixel_scale,
                        ..default()
                    },
                    TextColor(*color),
                    TextLayout {
                        justify,
                        ..default()
                    },
                    anchor,
                    Transform::from_translation(to_world(*position, window_size).extend(z)),
                ));
                if let Some(wrap) = wrap {
                    text.insert(TextBounds {
                        width: Some(wrap.width() * window_size.x),
                        height: None,
                    });
                }
            }
        }
    }
}
