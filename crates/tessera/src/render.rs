//! Renderer collaborator interface.
//!
//! A [`Renderer`] turns a [`ResolvedDiagram`] into some output. [`render`]
//! drives it: composites are drawn before the blocks inside them, then every
//! edge is clipped to the outlines of its endpoints and drawn, and finally
//! the renderer is handed the diagram bounds.

use log::debug;

use tessera_core::{geometry::Bounds, geometry::Point, shape::ShapeKind};

use crate::resolve::{PlacedBlock, ResolvedDiagram, RoutedEdge};

/// Corner radius of round blocks.
const ROUND_RADIUS: f32 = 5.0;

/// The draw primitives a renderer has to provide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderShape {
    Rect { radius: f32 },
    Composite,
    Question,
    Hexagon,
    Circle,
    DoubleCircle,
    Stadium,
    Subroutine,
    Cylinder,
    LeanLeft,
    LeanRight,
    Trapezoid,
    InvTrapezoid,
    RectLeftInvArrow,
    BlockArrow,
}

impl RenderShape {
    /// Maps a shape kind to its primitive. Spacers draw nothing.
    ///
    /// ```
    /// use tessera::render::RenderShape;
    /// use tessera_core::shape::ShapeKind;
    ///
    /// assert_eq!(RenderShape::for_kind(ShapeKind::Diamond), Some(RenderShape::Question));
    /// assert_eq!(RenderShape::for_kind(ShapeKind::Space), None);
    /// ```
    pub fn for_kind(kind: ShapeKind) -> Option<Self> {
        let shape = match kind {
            ShapeKind::Space => return None,
            ShapeKind::Unknown | ShapeKind::Square => Self::Rect { radius: 0.0 },
            ShapeKind::Round => Self::Rect {
                radius: ROUND_RADIUS,
            },
            ShapeKind::Composite => Self::Composite,
            ShapeKind::Diamond => Self::Question,
            ShapeKind::Hexagon => Self::Hexagon,
            ShapeKind::Circle => Self::Circle,
            ShapeKind::DoubleCircle => Self::DoubleCircle,
            ShapeKind::Stadium => Self::Stadium,
            ShapeKind::Subroutine => Self::Subroutine,
            ShapeKind::Cylinder => Self::Cylinder,
            ShapeKind::LeanLeft => Self::LeanLeft,
            ShapeKind::LeanRight => Self::LeanRight,
            ShapeKind::Trapezoid => Self::Trapezoid,
            ShapeKind::InvTrapezoid => Self::InvTrapezoid,
            ShapeKind::RectLeftInvArrow => Self::RectLeftInvArrow,
            ShapeKind::BlockArrow => Self::BlockArrow,
        };
        Some(shape)
    }
}

/// A rendering backend.
pub trait Renderer {
    type Output;

    /// Where the line from the center of `block` toward `toward` crosses its outline.
    fn intersect(&self, block: &PlacedBlock, toward: Point) -> Point {
        block
            .kind()
            .intersect(block.center(), block.size(), block.directions(), toward)
    }

    fn draw_block(&mut self, block: &PlacedBlock, shape: RenderShape);

    /// Draws an edge along `points`, already clipped to the endpoint outlines.
    fn draw_edge(&mut self, edge: &RoutedEdge, points: &[Point]);

    fn finish(self, bounds: Bounds) -> Self::Output;
}

/// Draws `diagram` with `renderer` and returns its output.
pub fn render<R: Renderer>(diagram: &ResolvedDiagram, mut renderer: R) -> R::Output {
    for block in diagram.blocks() {
        if let Some(shape) = RenderShape::for_kind(block.kind()) {
            renderer.draw_block(block, shape);
        }
    }

    for edge in diagram.edges() {
        let (Some(start), Some(end)) = (diagram.block(edge.start()), diagram.block(edge.end()))
        else {
            continue;
        };
        let mut points = edge.points().to_vec();
        if points.len() >= 2 {
            let last = points.len() - 1;
            points[0] = renderer.intersect(start, points[1]);
            points[last] = renderer.intersect(end, points[last - 1]);
        }
        renderer.draw_edge(edge, &points);
    }

    debug!(
        blocks = diagram.blocks().count(),
        edges = diagram.edges().len();
        "Rendered diagram"
    );
    renderer.finish(diagram.bounds())
}
