//! Pixel layout of a menu and its resolved screen-fraction geometry.
use bevy::prelude::*;
use serde::Deserialize;

use crate::systems::ui::menu_surface::REFERENCE_HEIGHT;

pub const DEFAULT_MAX_VISIBLE: usize = 15;
pub const DEFAULT_SUBMENU_INDICATOR: &str = "  >";
/// Horizontal padding between the box edge and item text, in pixels.
pub const TEXT_PADDING_PX: f32 = 10.0;

const TITLE_TEXT_OFFSET_DIVISOR: f32 = 35.0;
const ITEM_TEXT_OFFSET_DIVISOR: f32 = 30.13;

/// Pixel layout against a 1080 pixel tall logical screen.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MenuLayout {
    pub x: f32,
    pub y: f32,
    pub box_width: f32,
    pub box_height: f32,
    pub title_height: f32,
    pub underline_height: f32,
    pub scrollbar_width: f32,
    pub title_scale: f32,
    pub item_scale: f32,
    pub max_visible: usize,
    pub use_scroll: bool,
    pub submenu_indicator: String,
}

impl Default for MenuLayout {
    fn default() -> Self {
        Self {
            x: 38.0,
            y: 38.0,
            box_width: 500.0,
            box_height: 38.0,
            title_height: 76.0,
            underline_height: 1.0,
            scrollbar_width: 4.0,
            title_scale: 0.9,
            item_scale: 0.452,
            max_visible: DEFAULT_MAX_VISIBLE,
            use_scroll: true,
            submenu_indicator: DEFAULT_SUBMENU_INDICATOR.to_string(),
        }
    }
}

impl MenuLayout {
    /// Compact layout used by display-only menus.
    pub fn display_only() -> Self {
        Self {
            box_width: 400.0,
            title_scale: 0.5,
            max_visible: 8,
            ..Self::default()
        }
    }
}

/// Layout resolved into screen fractions for one aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MenuGeometry {
    pub aspect_ratio: f32,
    pub logical_width: f32,
    pub box_center_x: f32,
    pub box_width: f32,
    pub title_box_y: f32,
    pub title_box_height: f32,
    pub title_text_y: f32,
    pub underline_y: f32,
    pub underline_height: f32,
    pub item_box_y: f32,
    pub item_text_y: f32,
    pub row_step: f32,
    pub item_text_x: f32,
    pub item_value_x: f32,
    pub scrollbar_x: f32,
    pub scrollbar_width: f32,
    pub description_text_right: f32,
}

impl MenuGeometry {
    pub fn compute(layout: &MenuLayout, aspect_ratio: f32) -> Self {
        let height = REFERENCE_HEIGHT;
        let width = REFERENCE_HEIGHT * aspect_ratio;

        let title_box_height = layout.title_height / height;
        let title_box_y = layout.y / height + title_box_height / 2.0;
        let box_width = layout.box_width / width;
        let box_center_x = layout.x / width + box_width / 2.0;
        let row_step = layout.box_height / height;
        let underline_height = layout.underline_height / height;
        let scrollbar_width = layout.scrollbar_width / width;

        let underline_y = title_box_y + title_box_height / 2.0 + underline_height / 2.0;
        let item_box_y = underline_y + underline_height / 2.0 + row_step / 2.0;
        let right_edge = box_center_x + box_width / 2.0;
        let scrollbar_x = right_edge - scrollbar_width / 2.0;
        let item_text_x = (layout.x + TEXT_PADDING_PX) / width;

        Self {
            aspect_ratio,
            logical_width: width,
            box_center_x,
            box_width,
            title_box_y,
            title_box_height,
            title_text_y: title_box_y - layout.title_scale / TITLE_TEXT_OFFSET_DIVISOR,
            underline_y,
            underline_height,
            item_box_y,
            item_text_y: item_box_y - layout.item_scale / ITEM_TEXT_OFFSET_DIVISOR,
            row_step,
            item_text_x,
            item_value_x: scrollbar_x - scrollbar_width / 2.0,
            scrollbar_x,
            scrollbar_width,
            description_text_right: item_text_x
                + (layout.box_width - 2.0 * TEXT_PADDING_PX) / width,
        }
    }

    /// Box center of the row drawn in window slot `slot`.
    pub fn row_center(&self, slot: usize) -> Vec2 {
        Vec2::new(self.box_center_x, self.item_box_y + slot as f32 * self.row_step)
    }

    pub fn row_text_y(&self, slot: usize) -> f32 {
        self.item_text_y + slot as f32 * self.row_step
    }

    pub fn row_size(&self) -> Vec2 {
        Vec2::new(self.box_width, self.row_step)
    }

    /// Number of description rows needed for a text `width_px` pixels wide.
    pub fn description_lines(&self, layout: &MenuLayout, width_px: f32) -> usize {
        let usable = (layout.box_width - TEXT_PADDING_PX).max(1.0);
        let lines = (width_px / usable).ceil();
        if lines.is_finite() && lines >= 1.0 {
            lines as usize
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_stacks_title_underline_and_rows() {
        let layout = MenuLayout::default();
        let geometry = MenuGeometry::compute(&layout, 16.0 / 9.0);

        assert!(geometry.title_box_y < geometry.underline_y);
        assert!(geometry.underline_y < geometry.item_box_y);
        assert!((geometry.row_step - 38.0 / 1080.0).abs() < 1e-6);
        assert!((geometry.title_box_y - (38.0 + 38.0) / 1080.0).abs() < 1e-6);
        assert!(geometry.item_value_x < geometry.box_center_x + geometry.box_width / 2.0);
        assert!(geometry.item_text_x > geometry.box_center_x - geometry.box_width / 2.0);
    }

    #[test]
    fn wider_screens_narrow_the_box_fraction() {
        let layout = MenuLayout::default();
        let narrow = MenuGeometry::compute(&layout, 4.0 / 3.0);
        let wide = MenuGeometry::compute(&layout, 21.0 / 9.0);
        assert!(wide.box_width < narrow.box_width);
        assert_eq!(wide.row_step, narrow.row_step);
    }

    #[test]
    fn description_lines_round_up() {
        let layout = MenuLayout::default();
        let geometry = MenuGeometry::compute(&layout, 16.0 / 9.0);
        assert_eq!(geometry.description_lines(&layout, 0.0), 1);
        assert_eq!(geometry.description_lines(&layout, 490.0), 1);
        assert_eq!(geometry.description_lines(&layout, 491.0), 2);
        assert_eq!(geometry.description_lines(&layout, 1500.0), 4);
    }
}
