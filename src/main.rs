use std::fmt;

use bevy::{app::AppExit, prelude::*};
use enum_map::Enum;

use menu_engine::{
    systems::{
        interaction::MenuAction,
        ui::menu::value_controls::{control_bool, control_enum, control_float, NumberStep},
    },
    Item, ItemId, MenuEnginePlugin, MenuId, MenuPool, MenuStyle, MenuSystems,
};

const CONFIG: &str = include_str!("../assets/menu_config.json");

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Resource, Debug, Clone)]
struct Settings {
    volume: f64,
    muted: bool,
    quality: Quality,
    vsync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            muted: false,
            quality: Quality::default(),
            vsync: true,
        }
    }
}

#[derive(Resource)]
struct DemoMenus {
    main: MenuId,
    options: MenuId,
    quit: ItemId,
    volume: ItemId,
    muted: ItemId,
    quality: ItemId,
    vsync: ItemId,
}

fn main() {
    let engine = match MenuEnginePlugin::from_json(CONFIG) {
        Ok(plugin) => plugin,
        Err(err) => {
            eprintln!("{err}; falling back to defaults");
            MenuEnginePlugin::default()
        }
    };

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(engine)
        .init_resource::<Settings>()
        .add_systems(Startup, build_menus)
        .add_systems(
            Update,
            (apply_settings, quit_on_select)
                .after(MenuSystems::Tick)
                .before(MenuSystems::Output)
                .run_if(resource_exists::<DemoMenus>),
        )
        .run();
}

fn build_menus(
    mut commands: Commands,
    mut pool: ResMut<MenuPool>,
    style: Res<MenuStyle>,
    settings: Res<Settings>,
) {
    let mut main = style.menu("Main Menu");
    main.add_item(Item::plain("Play").with_description("Nothing to play yet."));
    let mut plays = 0u32;
    main.listeners_mut().on_selected(move |menu, item, _| {
        if menu.item(item).is_some_and(|selected| selected.text() == "Play") {
            plays += 1;
            if let Some(play) = menu.item_mut(item) {
                play.set_description(format!("Pressed {plays} times."));
            }
        }
    });
    let main = pool.register(main);

    let mut options = style.menu("Options");
    options.add_item(Item::subsection("Audio"));
    let volume = options.add_item(
        Item::number_stepper("Volume", settings.volume)
            .with_description("Hold shift to change in larger steps."),
    );
    let muted = options.add_item(Item::toggle("Mute", settings.muted));
    options.add_item(Item::subsection("Video"));
    let quality = options.add_item(Item::enum_stepper("Quality", settings.quality));
    options.add_item(Item::list(
        "Resolution",
        ["1280x720", "1920x1080", "2560x1440"],
        1,
    ));
    let vsync = options.add_item(Item::toggle("Vsync", settings.vsync));

    let Some((options, _)) = pool.add_submenu(
        options,
        main,
        "Options",
        Some("Audio and video settings."),
        true,
    ) else {
        return;
    };

    let mut credits = style.display_only("Credits");
    for line in ["Programming", "Design", "Testing", "Thanks for playing"] {
        credits.add_item(Item::plain(line));
    }
    pool.add_submenu(credits, main, "Credits", None, true);

    let Some(menu) = pool.menu_mut(main) else {
        return;
    };
    let quit = menu.add_item(Item::plain("Quit"));
    pool.set_visible(main, true);

    commands.insert_resource(DemoMenus {
        main,
        options,
        quit,
        volume,
        muted,
        quality,
        vsync,
    });
}

fn apply_settings(
    menus: Res<DemoMenus>,
    mut pool: ResMut<MenuPool>,
    mut settings: ResMut<Settings>,
) {
    let Some(menu) = pool.menu_mut(menus.options) else {
        return;
    };
    let step = NumberStep::new(0.05, 0.25).with_range(0.0..=1.0);
    let settings = &mut *settings;

    let mut changed = control_float(menu, menus.volume, &mut settings.volume, &step);
    changed |= control_bool(menu, menus.muted, &mut settings.muted);
    changed |= control_enum(menu, menus.quality, &mut settings.quality);
    changed |= control_bool(menu, menus.vsync, &mut settings.vsync);
    if changed {
        info!("settings: {settings:?}");
    }
}

fn quit_on_select(
    menus: Res<DemoMenus>,
    pool: Res<MenuPool>,
    mut app_exit: MessageWriter<AppExit>,
) {
    let Some(menu) = pool.menu(menus.main) else {
        return;
    };
    if menu.is_selected(menus.quit) && menu.edges().pressed(MenuAction::Accept) {
        app_exit.write(AppExit::Success);
    }
}
