//! CSS color values used by style declarations.
//!
//! The [`Color`] type wraps `DynamicColor` from the color crate. Block styles
//! keep their raw declaration text, but every color-valued declaration is
//! parsed through [`Color::new`] so malformed values are rejected early.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;
use thiserror::Error;

/// A color string that could not be parsed as CSS.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{input}`: {reason}")]
pub struct InvalidColor {
    input: String,
    reason: String,
}

impl InvalidColor {
    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Wrapper around the `DynamicColor` type from the color crate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Parse a CSS color string such as `#ff0000`, `rgb(255, 0, 0)` or `red`.
    ///
    /// ```
    /// use tessera_core::color::Color;
    ///
    /// assert!(Color::new("#f9f").is_ok());
    /// assert!(Color::new("rgb(10, 20, 30)").is_ok());
    /// assert!(Color::new("definitely-not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, InvalidColor> {
        DynamicColor::from_str(color_str.trim())
            .map(|color| Self { color })
            .map_err(|err| InvalidColor {
                input: color_str.to_string(),
                reason: err.to_string(),
            })
    }

    /// Returns the alpha component between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}
