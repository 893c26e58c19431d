use bevy::prelude::*;

use crate::systems::{
    audio::{play_queued_cues, CueQueue, MenuSoundPaths},
    colors::MenuTheme,
    ui::menu::{
        menu_input::{tick_menu_pool, track_last_input_method, LastInputMethod},
        schema::{parse_menu_config, MenuConfigError, MenuEngineConfig},
        InputBindings, Menu, MenuLayout, MenuPool, MenuSystems,
    },
};

pub mod render;
pub mod shortcuts;

use render::RenderPlugin;

/// Layout and palette every menu built by the host should start from.
#[derive(Resource, Debug, Clone, Default)]
pub struct MenuStyle {
    pub layout: MenuLayout,
    pub theme: MenuTheme,
}

impl MenuStyle {
    pub fn from_config(config: &MenuEngineConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            theme: MenuTheme::from(&config.theme),
        }
    }

    pub fn menu(&self, title: impl Into<String>) -> Menu {
        Menu::with_layout(title, self.layout.clone()).with_theme(self.theme)
    }

    pub fn display_only(&self, title: impl Into<String>) -> Menu {
        Menu::display_only(title).with_theme(self.theme)
    }
}

pub struct MenuEnginePlugin {
    pub config: MenuEngineConfig,
    pub spawn_camera: bool,
}

impl Default for MenuEnginePlugin {
    fn default() -> Self {
        Self {
            config: MenuEngineConfig::default(),
            spawn_camera: true,
        }
    }
}

impl MenuEnginePlugin {
    pub fn from_json(json: &str) -> Result<Self, MenuConfigError> {
        Ok(Self {
            config: parse_menu_config(json)?,
            ..default()
        })
    }
}

impl Plugin for MenuEnginePlugin {
    fn build(&self, app: &mut App) {
        info!(
            "menu engine: {} visible rows, {}ms input interval",
            self.config.layout.max_visible, self.config.input.normal_interval_ms
        );
        app.insert_resource(MenuPool::new(self.config.input.timing()))
            .insert_resource(MenuSoundPaths::from(&self.config.sounds))
            .insert_resource(MenuStyle::from_config(&self.config))
            .init_resource::<InputBindings>()
            .init_resource::<LastInputMethod>()
            .init_resource::<CueQueue>()
            .configure_sets(
                Update,
                (MenuSystems::Input, MenuSystems::Tick, MenuSystems::Output).chain(),
            )
            .add_plugins(RenderPlugin {
                spawn_camera: self.spawn_camera,
            })
            .add_systems(
                Update,
                (
                    track_last_input_method,
                    shortcuts::toggle_menus.after(track_last_input_method),
                )
                    .in_set(MenuSystems::Input),
            )
            .add_systems(Update, tick_menu_pool.in_set(MenuSystems::Tick))
            .add_systems(Update, play_queued_cues.in_set(MenuSystems::Output));
    }
}
