//! Export backends for resolved diagrams.
//!
//! Backends implement [`Renderer`](crate::render::Renderer) and are driven
//! by [`render`](crate::render::render).
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ parse
//! Document
//!     ↓ layout + resolve
//! ResolvedDiagram
//!     ↓ export (this module)
//! Output
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgRenderer`]

pub mod svg;
