//! Drawing surface consumed by menus.
//!
//! Menus never touch entities directly. They describe each frame as text runs
//! and filled rectangles through [`Renderer`], with every position and size
//! expressed as a fraction of the screen (`0.0..=1.0`, origin top-left, y
//! pointing down). [`DrawList`] is the retained implementation the bevy host
//! mirrors into sprites and `Text2d` entities.
use bevy::prelude::*;

/// Logical screen height used to turn pixel layout into screen fractions.
pub const REFERENCE_HEIGHT: f32 = 1080.0;
/// Font size in pixels of a text run drawn at scale `1.0`.
pub const FONT_PX_PER_SCALE: f32 = 60.0;
pub const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Title,
    Body,
}

impl FontStyle {
    /// Average glyph advance as a share of the font size.
    pub const fn advance_ratio(self) -> f32 {
        match self {
            Self::Title => 0.58,
            Self::Body => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

/// Horizontal extent a wrapped run must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapBounds {
    pub left: f32,
    pub right: f32,
}

impl WrapBounds {
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRun<'a> {
    pub content: &'a str,
    pub font: FontStyle,
    pub scale: f32,
    pub color: Color,
    pub position: Vec2,
    pub justification: Justification,
    pub wrap: Option<WrapBounds>,
}

pub trait Renderer {
    fn draw_text(&mut self, run: &TextRun<'_>);

    fn draw_rect(&mut self, center: Vec2, size: Vec2, color: Color);

    /// Width of `content` as a fraction of the screen width.
    fn measure_width(&self, content: &str, font: FontStyle, scale: f32) -> f32;

    fn aspect_ratio(&self) -> f32 {
        DEFAULT_ASPECT_RATIO
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        content: String,
        font: FontStyle,
        scale: f32,
        color: Color,
        position: Vec2,
        justification: Justification,
        wrap: Option<WrapBounds>,
    },
    Rect {
        center: Vec2,
        size: Vec2,
        color: Color,
    },
}

/// Commands recorded since the last [`DrawList::clear`].
#[derive(Resource, Debug, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    aspect_ratio: f32,
}

impl Default for DrawList {
    fn default() -> Self {
        Self::with_aspect_ratio(DEFAULT_ASPECT_RATIO)
    }
}

impl DrawList {
    pub fn with_aspect_ratio(aspect_ratio: f32) -> Self {
        let mut list = Self {
            commands: Vec::new(),
            aspect_ratio: DEFAULT_ASPECT_RATIO,
        };
        list.set_aspect_ratio(aspect_ratio);
        list
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { content, .. } => Some(content.as_str()),
            DrawCommand::Rect { .. } => None,
        })
    }

    pub fn rect_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Rect { .. }))
            .count()
    }

    pub fn logical_width(&self) -> f32 {
        REFERENCE_HEIGHT * self.aspect_ratio
    }
}

impl Renderer for DrawList {
    fn draw_text(&mut self, run: &TextRun<'_>) {
        self.commands.push(DrawCommand::Text {
            content: run.content.to_string(),
            font: run.font,
            scale: run.scale,
            color: run.color,
            position: run.position,
            justification: run.justification,
            wrap: run.wrap,
        });
    }

    fn draw_rect(&mut self, center: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect { center, size, color });
    }

    fn measure_width(&self, content: &str, font: FontStyle, scale: f32) -> f32 {
        let glyphs = content.chars().count() as f32;
        let pixels = glyphs * font.advance_ratio() * FONT_PX_PER_SCALE * scale;
        pixels / self.logical_width()
    }

    fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}
