//! Configuration types for Tessera diagram layout and rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out, how labels are measured and how output is styled. All types
//! implement [`serde::Deserialize`] for loading from external sources; every
//! field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Grid padding, shape padding, block limit and per-shape minimum sizes.
//! - [`TextConfig`] - Font and measurement strategy for labels.
//! - [`StyleConfig`] - Visual styling options such as background color.
//!
//! # Example
//!
//! ```
//! # use tessera::config::AppConfig;
//! let config: AppConfig = AppConfig::default();
//! assert_eq!(config.layout().padding(), 8.0);
//! assert!(config.style().background_color().is_ok());
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use tessera_core::{
    color::Color,
    geometry::Size,
    shape::ShapeKind,
    text::{EstimatedMeasure, FontMeasure, TextMeasure},
};
use tessera_parser::ParseConfig;

const DEFAULT_PADDING: f32 = 8.0;
const DEFAULT_FONT_FAMILY: &str = "Arial";
const DEFAULT_FONT_SIZE: u16 = 12;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Label measurement section.
    #[serde(default)]
    text: TextConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its three sections.
    pub fn new(layout: LayoutConfig, text: TextConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            text,
            style,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the text configuration.
    pub fn text(&self) -> &TextConfig {
        &self.text
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Minimum size of every block of one shape kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SizeHint {
    #[serde(default)]
    min_width: f32,
    #[serde(default)]
    min_height: f32,
}

impl SizeHint {
    pub fn new(min_width: f32, min_height: f32) -> Self {
        Self {
            min_width,
            min_height,
        }
    }

    pub fn to_size(self) -> Size {
        Size::new(self.min_width, self.min_height)
    }
}

/// Layout engine configuration.
///
/// `padding` is the gap between grid cells and around the edge of every
/// composite. `node_padding` is the room a shape leaves around its label.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_padding")]
    padding: f32,

    #[serde(default = "default_padding")]
    node_padding: f32,

    #[serde(default = "default_max_blocks")]
    max_blocks: usize,

    /// Minimum sizes keyed by shape kind, e.g. `[layout.shape_hints.circle]`.
    #[serde(default)]
    shape_hints: HashMap<ShapeKind, SizeHint>,
}

impl LayoutConfig {
    /// Creates a [`LayoutConfig`] with the given paddings and default limits.
    pub fn new(padding: f32, node_padding: f32) -> Self {
        Self {
            padding,
            node_padding,
            ..Self::default()
        }
    }

    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    pub fn with_shape_hint(mut self, kind: ShapeKind, hint: SizeHint) -> Self {
        self.shape_hints.insert(kind, hint);
        self
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn node_padding(&self) -> f32 {
        self.node_padding
    }

    pub fn max_blocks(&self) -> usize {
        self.max_blocks
    }

    /// Returns the configured minimum size for a shape kind, if any.
    pub fn shape_hint(&self, kind: ShapeKind) -> Option<Size> {
        self.shape_hints.get(&kind).map(|hint| hint.to_size())
    }

    /// Returns the limits handed to the parser.
    pub fn parse_config(&self) -> ParseConfig {
        ParseConfig::new(self.max_blocks)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            node_padding: DEFAULT_PADDING,
            max_blocks: ParseConfig::DEFAULT_MAX_BLOCKS,
            shape_hints: HashMap::new(),
        }
    }
}

/// How label sizes are obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measurement {
    /// Shape the text against the installed fonts.
    #[default]
    Font,
    /// Estimate from character counts.
    Estimate,
}

/// Label measurement configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TextConfig {
    #[serde(default = "default_font_family")]
    font_family: String,

    #[serde(default = "default_font_size")]
    font_size: u16,

    #[serde(default)]
    measurement: Measurement,
}

impl TextConfig {
    pub fn new(font_family: impl Into<String>, font_size: u16, measurement: Measurement) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            measurement,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    /// Builds the text measurer selected by [`Measurement`].
    pub fn measure(&self) -> Box<dyn TextMeasure> {
        match self.measurement {
            Measurement::Font => Box::new(FontMeasure::new(&self.font_family, self.font_size)),
            Measurement::Estimate => Box::new(EstimatedMeasure::new(self.font_size)),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, Measurement::default())
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Default background [`Color`] for diagrams, as a color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

fn default_padding() -> f32 {
    DEFAULT_PADDING
}

fn default_max_blocks() -> usize {
    ParseConfig::DEFAULT_MAX_BLOCKS
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> u16 {
    DEFAULT_FONT_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().padding(), 8.0);
        assert_eq!(config.layout().node_padding(), 8.0);
        assert_eq!(config.layout().max_blocks(), 10_000);
        assert_eq!(config.layout().shape_hint(ShapeKind::Circle), None);
        assert_eq!(config.text().measurement(), Measurement::Font);
        assert_eq!(config.style().background_color(), Ok(None));
    }

    #[test]
    fn test_parse_config_follows_limit() {
        let layout = LayoutConfig::default().with_max_blocks(3);
        assert_eq!(layout.parse_config().max_blocks(), 3);
    }

    #[test]
    fn test_shape_hint() {
        let layout = LayoutConfig::new(4.0, 2.0)
            .with_shape_hint(ShapeKind::Diamond, SizeHint::new(60.0, 60.0));
        assert_eq!(layout.padding(), 4.0);
        assert_eq!(
            layout.shape_hint(ShapeKind::Diamond),
            Some(Size::new(60.0, 60.0))
        );
        assert_eq!(layout.shape_hint(ShapeKind::Square), None);
    }

    #[test]
    fn test_invalid_background_color() {
        let style = StyleConfig::new(Some("nope".to_string()));
        let err = style.background_color().expect_err("invalid color");
        assert!(err.starts_with("Invalid background color in config"));
    }
}
