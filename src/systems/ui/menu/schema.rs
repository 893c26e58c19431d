use std::{error::Error, fmt, time::Duration};

use serde::Deserialize;

use crate::systems::{colors::ThemeConfig, interaction::InputTiming};

use super::layout::MenuLayout;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MenuEngineConfig {
    pub input: InputConfig,
    pub layout: MenuLayout,
    pub theme: ThemeConfig,
    pub sounds: SoundConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct InputConfig {
    pub normal_interval_ms: u64,
    pub fast_interval_ms: u64,
    pub transition_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            normal_interval_ms: 80,
            fast_interval_ms: 20,
            transition_interval_ms: 350,
        }
    }
}

impl InputConfig {
    pub fn timing(&self) -> InputTiming {
        InputTiming {
            normal: Duration::from_millis(self.normal_interval_ms),
            fast: Duration::from_millis(self.fast_interval_ms),
            transition: Duration::from_millis(self.transition_interval_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SoundConfig {
    pub navigate: String,
    pub select: String,
    pub back: String,
    pub volume: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            navigate: "sounds/menu_navigate.ogg".to_string(),
            select: "sounds/menu_select.ogg".to_string(),
            back: "sounds/menu_back.ogg".to_string(),
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuConfigError {
    Parse(String),
    Validation(String),
}

impl fmt::Display for MenuConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "menu config parse error: {err}"),
            Self::Validation(err) => write!(f, "menu config validation error: {err}"),
        }
    }
}

impl Error for MenuConfigError {}

fn require_positive(name: &str, value: f32) -> Result<(), MenuConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MenuConfigError::Validation(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

fn require_finite(name: &str, value: f32) -> Result<(), MenuConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MenuConfigError::Validation(format!("{name} must be finite")))
    }
}

fn validate_config(config: &MenuEngineConfig) -> Result<(), MenuConfigError> {
    let input = &config.input;
    if input.normal_interval_ms == 0 {
        return Err(MenuConfigError::Validation(
            "input.normal_interval_ms must be greater than zero".to_string(),
        ));
    }
    if input.fast_interval_ms > input.normal_interval_ms {
        return Err(MenuConfigError::Validation(format!(
            "input.fast_interval_ms ({}) must not exceed input.normal_interval_ms ({})",
            input.fast_interval_ms, input.normal_interval_ms
        )));
    }

    let layout = &config.layout;
    require_finite("layout.x", layout.x)?;
    require_finite("layout.y", layout.y)?;
    require_positive("layout.box_width", layout.box_width)?;
    require_positive("layout.box_height", layout.box_height)?;
    require_positive("layout.title_height", layout.title_height)?;
    require_positive("layout.underline_height", layout.underline_height)?;
    require_positive("layout.scrollbar_width", layout.scrollbar_width)?;
    require_positive("layout.title_scale", layout.title_scale)?;
    require_positive("layout.item_scale", layout.item_scale)?;
    if layout.max_visible == 0 {
        return Err(MenuConfigError::Validation(
            "layout.max_visible must be at least 1".to_string(),
        ));
    }

    let sounds = &config.sounds;
    for (name, path) in [
        ("sounds.navigate", &sounds.navigate),
        ("sounds.select", &sounds.select),
        ("sounds.back", &sounds.back),
    ] {
        if path.trim().is_empty() {
            return Err(MenuConfigError::Validation(format!(
                "{name} must not be blank"
            )));
        }
    }
    if !sounds.volume.is_finite() || sounds.volume < 0.0 {
        return Err(MenuConfigError::Validation(
            "sounds.volume must be finite and non-negative".to_string(),
        ));
    }

    Ok(())
}

pub fn parse_menu_config(json: &str) -> Result<MenuEngineConfig, MenuConfigError> {
    let config: MenuEngineConfig =
        serde_json::from_str(json).map_err(|err| MenuConfigError::Parse(err.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}
