pub mod startup;
pub mod systems;

pub use startup::{MenuEnginePlugin, MenuStyle};
pub use systems::ui::menu::{
    Item, ItemId, ItemValue, Menu, MenuId, MenuPool, MenuSystems,
};
