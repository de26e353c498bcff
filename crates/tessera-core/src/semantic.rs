//! Semantic document model.
//!
//! This module contains the representation of a block diagram after parsing
//! and population. The types are renderer-agnostic and hold no geometry;
//! sizes and positions are computed separately by the layout engine.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ lexer
//! Tokens
//!     ↓ LALR(1) parser
//! Statements - flat records with spans
//!     ↓ populate
//! Document (these types) - block tree, flat index, edges, style classes
//!     ↓ layout
//! Resolved geometry
//! ```
//!
//! # Organization
//!
//! - [`block`] - [`Block`], [`Direction`]
//! - [`edge`] - [`Edge`], [`ArrowKind`], [`LineStroke`]
//! - [`style`] - [`StyleClass`]
//! - [`document`] - [`Document`], the owner of everything above

pub mod block;
pub mod document;
pub mod edge;
pub mod style;

pub use block::*;
pub use document::*;
pub use edge::*;
pub use style::*;

/// Identifier of the implicit top-level composite of every document.
pub const ROOT_ID: &str = "root";
