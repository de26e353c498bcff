//! Layout engine for block diagrams.
//!
//! This module assigns every block of a [`Document`] a size and a center
//! inside the implicit grid of its parent composite.
//!
//! # Pipeline Position
//!
//! ```text
//! Document
//!     ↓ measure leaves
//! Intrinsic sizes
//!     ↓ sizing (measure bottom-up, fit top-down)
//! Sizes
//!     ↓ placement (top-down)
//! Geometry (this module)
//!     ↓ resolve
//! ResolvedDiagram
//! ```
//!
//! Sizes and centers live in a [`Geometry`] arena keyed by block id, so the
//! document itself is never mutated.
//!
//! # Submodules
//!
//! - [`grid`] - Row-major grid cells of a composite
//! - `sizing` - Natural sizes, then sibling-fit and growth
//! - `placement` - Top-down center assignment

pub mod grid;
mod placement;
mod sizing;

pub use grid::{Cell, Grid, grid_position};

use std::collections::HashMap;

use log::{debug, info};

use tessera_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    semantic::Document,
    text::TextMeasure,
};

use crate::{config::LayoutConfig, error::LayoutError};
use placement::Placer;
use sizing::Sizer;

/// Sizes and centers of every block placed in the tree.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    sizes: HashMap<Id, Size>,
    centers: HashMap<Id, Point>,
}

impl Geometry {
    pub fn size(&self, id: &str) -> Option<Size> {
        self.sizes.get(id).copied()
    }

    pub fn center(&self, id: &str) -> Option<Point> {
        self.centers.get(id).copied()
    }

    /// Axis-aligned box of a placed block.
    pub fn bounds(&self, id: &str) -> Option<Bounds> {
        Some(Bounds::new_from_center(self.center(id)?, self.size(id)?))
    }

    /// Returns true if the block was reached by the positioning pass.
    pub fn is_placed(&self, id: &str) -> bool {
        self.centers.contains_key(id)
    }

    fn check_finite(&self) -> Result<(), LayoutError> {
        let non_finite = self
            .sizes
            .iter()
            .find(|(_, size)| !size.is_finite())
            .map(|(id, _)| id)
            .or_else(|| {
                self.centers
                    .iter()
                    .find(|(_, center)| !center.is_finite())
                    .map(|(id, _)| id)
            });

        match non_finite {
            Some(id) => Err(LayoutError::NonFiniteGeometry {
                block: id.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Computes [`Geometry`] for documents.
///
/// # Examples
///
/// ```
/// use tessera::{config::LayoutConfig, layout::LayoutEngine};
/// use tessera_core::text::EstimatedMeasure;
/// use tessera_parser::{ParseConfig, parse};
///
/// let document = parse("block-beta\ncolumns 2\na b c", ParseConfig::default()).unwrap();
/// let config = LayoutConfig::default();
/// let measure = EstimatedMeasure::new(12);
///
/// let engine = LayoutEngine::new(&config, &measure).unwrap();
/// let geometry = engine.compute(&document).unwrap();
///
/// let a = geometry.center("a").unwrap();
/// let c = geometry.center("c").unwrap();
/// assert_eq!(a.x(), c.x());
/// assert!(c.y() > a.y());
/// ```
pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    measure: &'a dyn TextMeasure,
}

impl<'a> LayoutEngine<'a> {
    /// Creates an engine.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPadding`] if either padding is negative
    /// or not finite.
    pub fn new(config: &'a LayoutConfig, measure: &'a dyn TextMeasure) -> Result<Self, LayoutError> {
        for padding in [config.padding(), config.node_padding()] {
            if !padding.is_finite() || padding < 0.0 {
                return Err(LayoutError::InvalidPadding(padding));
            }
        }
        Ok(Self { config, measure })
    }

    /// Runs both layout passes over `document`.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] for a composite with zero columns or for
    /// geometry that is not finite.
    pub fn compute(&self, document: &Document) -> Result<Geometry, LayoutError> {
        info!(blocks = document.len(); "Computing layout");

        let padding = self.config.padding();
        let intrinsic = self.intrinsic_sizes(document);

        let mut sizer = Sizer::new(document, padding, intrinsic);
        sizer.size_block(&Id::root(), Size::default())?;
        let sizes = sizer.into_sizes();
        debug!(sized = sizes.len(); "Sizing pass complete");

        let mut placer = Placer::new(document, padding, &sizes);
        placer.place_root()?;
        let centers = placer.into_centers();
        debug!(placed = centers.len(); "Positioning pass complete");

        let geometry = Geometry { sizes, centers };
        geometry.check_finite()?;
        Ok(geometry)
    }

    /// Measures the label of every leaf in the tree and wraps it in its shape.
    fn intrinsic_sizes(&self, document: &Document) -> HashMap<Id, Size> {
        document
            .walk()
            .into_iter()
            .filter(|block| !block.is_composite() && !block.is_space())
            .map(|block| {
                let label = self.measure.measure(block.label());
                let mut size = block.kind().content_size(
                    label,
                    self.config.node_padding(),
                    block.directions(),
                );
                if let Some(hint) = self.config.shape_hint(block.kind()) {
                    size = size.max(hint);
                }
                (block.id().clone(), size)
            })
            .collect()
    }
}
