//! Menu palettes.
//!
//! Colors are configured as sRGB byte quadruples (`[r, g, b, a]`) and turned
//! into bevy [`Color`]s once, when a theme is applied to a menu.
use bevy::prelude::*;
use serde::Deserialize;

pub type Rgba8 = [u8; 4];

pub const TITLE_TEXT: Rgba8 = [255, 255, 255, 255];
pub const TITLE_BACKGROUND: Rgba8 = [0, 0, 0, 144];
pub const TITLE_UNDERLINE: Rgba8 = [0, 255, 255, 140];
pub const DEFAULT_TEXT: Rgba8 = [255, 255, 255, 255];
pub const DEFAULT_BOX: Rgba8 = [0, 0, 0, 144];
pub const HIGHLIGHTED_TEXT: Rgba8 = [0, 255, 255, 255];
pub const HIGHLIGHTED_BOX: Rgba8 = [0, 0, 0, 255];
pub const SUBSECTION_TEXT: Rgba8 = [255, 255, 255, 180];
pub const SUBSECTION_BOX: Rgba8 = [0, 0, 0, 144];
pub const DESCRIPTION_TEXT: Rgba8 = [0, 0, 0, 255];
pub const DESCRIPTION_BOX: Rgba8 = [0, 255, 255, 150];

pub fn rgba8(color: Rgba8) -> Color {
    let [r, g, b, a] = color;
    Color::srgba_u8(r, g, b, a)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ThemeConfig {
    pub title_text: Rgba8,
    pub title_background: Rgba8,
    pub title_underline: Rgba8,
    pub default_text: Rgba8,
    pub default_box: Rgba8,
    pub highlighted_text: Rgba8,
    pub highlighted_box: Rgba8,
    pub subsection_text: Rgba8,
    pub subsection_box: Rgba8,
    pub description_text: Rgba8,
    pub description_box: Rgba8,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            title_text: TITLE_TEXT,
            title_background: TITLE_BACKGROUND,
            title_underline: TITLE_UNDERLINE,
            default_text: DEFAULT_TEXT,
            default_box: DEFAULT_BOX,
            highlighted_text: HIGHLIGHTED_TEXT,
            highlighted_box: HIGHLIGHTED_BOX,
            subsection_text: SUBSECTION_TEXT,
            subsection_box: SUBSECTION_BOX,
            description_text: DESCRIPTION_TEXT,
            description_box: DESCRIPTION_BOX,
        }
    }
}

/// Box and text color of one row style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowColors {
    pub text: Color,
    pub background: Color,
}

/// Resolved palette of a single menu. The scroll bar reuses the underline color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuTheme {
    pub title_text: Color,
    pub title_background: Color,
    pub title_underline: Color,
    pub default: RowColors,
    pub highlighted: RowColors,
    pub subsection: RowColors,
    pub description: RowColors,
}

impl MenuTheme {
    pub fn scroll_bar(&self) -> Color {
        self.title_underline
    }
}

impl Default for MenuTheme {
    fn default() -> Self {
        Self::from(&ThemeConfig::default())
    }
}

impl From<&ThemeConfig> for MenuTheme {
    fn from(config: &ThemeConfig) -> Self {
        Self {
            title_text: rgba8(config.title_text),
            title_background: rgba8(config.title_background),
            title_underline: rgba8(config.title_underline),
            default: RowColors {
                text: rgba8(config.default_text),
                background: rgba8(config.default_box),
            },
            highlighted: RowColors {
                text: rgba8(config.highlighted_text),
                background: rgba8(config.highlighted_box),
            },
            subsection: RowColors {
                text: rgba8(config.subsection_text),
                background: rgba8(config.subsection_box),
            },
            description: RowColors {
                text: rgba8(config.description_text),
                background: rgba8(config.description_box),
            },
        }
    }
}
