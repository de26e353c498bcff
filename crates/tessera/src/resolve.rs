//! Bounds and edge resolution.
//!
//! Runs once per document after both layout passes. It joins the document
//! with its [`Geometry`] into a [`ResolvedDiagram`]: every placed block with
//! its center and size, every edge with a three-point polyline between the
//! centers of its endpoints, and the bounding box of the whole diagram.

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Serialize, Serializer, ser::SerializeStruct};

use tessera_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    semantic::{ArrowKind, Direction, Document, Edge, LineStroke, StyleClass},
    shape::ShapeKind,
};

use crate::{error::TesseraError, layout::Geometry};

/// A block with its resolved geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    id: Id,
    kind: ShapeKind,
    label: String,
    markdown: bool,
    center: Point,
    size: Size,
    width_in_columns: u32,
    directions: Vec<Direction>,
    classes: Vec<String>,
    styles: Vec<String>,
}

impl PlacedBlock {
    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_markdown(&self) -> bool {
        self.markdown
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_center(self.center, self.size)
    }

    pub fn width_in_columns(&self) -> u32 {
        self.width_in_columns
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn styles(&self) -> &[String] {
        &self.styles
    }
}

/// An edge with the polyline between its endpoint centers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedEdge {
    id: Id,
    start: Id,
    end: Id,
    label: Option<String>,
    arrow_start: ArrowKind,
    arrow_end: ArrowKind,
    stroke: LineStroke,
    directions: Vec<Direction>,
    points: Vec<Point>,
}

impl RoutedEdge {
    fn new(edge: &Edge, start: Point, end: Point) -> Self {
        Self {
            id: edge.id().clone(),
            start: edge.start().clone(),
            end: edge.end().clone(),
            label: edge.label().map(str::to_string),
            arrow_start: edge.arrow_start(),
            arrow_end: edge.arrow_end(),
            stroke: edge.stroke(),
            directions: edge.directions().to_vec(),
            points: vec![start, start.midpoint(end), end],
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn start(&self) -> &Id {
        &self.start
    }

    pub fn end(&self) -> &Id {
        &self.end
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn arrow_start(&self) -> ArrowKind {
        self.arrow_start
    }

    pub fn arrow_end(&self) -> ArrowKind {
        self.arrow_end
    }

    pub fn stroke(&self) -> LineStroke {
        self.stroke
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Start center, midpoint and end center.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// A fully laid-out diagram, ready for a renderer.
///
/// Serializes to JSON with blocks keyed by id in tree order, edges in
/// declaration order and the bounding box as `{x, y, width, height}`.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedDiagram {
    blocks: IndexMap<Id, PlacedBlock>,
    edges: Vec<RoutedEdge>,
    classes: IndexMap<String, StyleClass>,
    #[serde(serialize_with = "serialize_bounds")]
    bounds: Bounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ResolvedDiagram {
    /// Blocks in tree order, parents before children, root excluded.
    pub fn blocks(&self) -> impl Iterator<Item = &PlacedBlock> {
        self.blocks.values()
    }

    pub fn block(&self, id: &str) -> Option<&PlacedBlock> {
        self.blocks.get(id)
    }

    pub fn edges(&self) -> &[RoutedEdge] {
        &self.edges
    }

    pub fn classes(&self) -> &IndexMap<String, StyleClass> {
        &self.classes
    }

    /// The box around every block, always including the origin.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Joins a document with its geometry.
///
/// # Errors
///
/// Returns [`TesseraError::UnresolvedReference`] if an edge names a block
/// that is not in the document. Edges whose endpoints exist but were never
/// placed in the tree are skipped with a warning.
pub fn resolve(document: &Document, geometry: &Geometry) -> Result<ResolvedDiagram, TesseraError> {
    let mut blocks = IndexMap::new();
    let mut bounds = Bounds::default();
    for block in document.walk() {
        let (Some(center), Some(size)) = (geometry.center(block.id()), geometry.size(block.id()))
        else {
            continue;
        };
        let placed = PlacedBlock {
            id: block.id().clone(),
            kind: block.kind(),
            label: block.label().to_string(),
            markdown: block.is_markdown(),
            center,
            size,
            width_in_columns: block.width_in_columns(),
            directions: block.directions().to_vec(),
            classes: block.classes().to_vec(),
            styles: block.styles().to_vec(),
        };
        bounds = bounds.merge(placed.bounds());
        blocks.insert(placed.id.clone(), placed);
    }

    let mut edges = Vec::with_capacity(document.edges().len());
    for edge in document.edges() {
        for endpoint in [edge.start(), edge.end()] {
            if !document.contains(endpoint) {
                return Err(TesseraError::UnresolvedReference {
                    edge: edge.id().to_string(),
                    block: endpoint.to_string(),
                });
            }
        }

        let (Some(start), Some(end)) = (geometry.center(edge.start()), geometry.center(edge.end()))
        else {
            warn!(
                edge = edge.id().as_str(),
                start = edge.start().as_str(),
                end = edge.end().as_str();
                "Skipping edge with an unplaced endpoint"
            );
            continue;
        };
        edges.push(RoutedEdge::new(edge, start, end));
    }

    debug!(
        blocks = blocks.len(),
        edges = edges.len(),
        width = bounds.width(),
        height = bounds.height();
        "Resolved diagram"
    );

    Ok(ResolvedDiagram {
        blocks,
        edges,
        classes: document.classes().clone(),
        bounds,
        title: document.title().map(str::to_string),
        description: document.description().map(str::to_string),
    })
}

fn serialize_bounds<S: Serializer>(bounds: &Bounds, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("Bounds", 4)?;
    state.serialize_field("x", &bounds.min_x())?;
    state.serialize_field("y", &bounds.min_y())?;
    state.serialize_field("width", &bounds.width())?;
    state.serialize_field("height", &bounds.height())?;
    state.end()
}

#[cfg(test)]
mod tests {
    use tessera_core::{semantic::Block, text::EstimatedMeasure};

    use super::*;
    use crate::{config::LayoutConfig, layout::LayoutEngine};

    fn layout(document: &Document) -> Geometry {
        let config = LayoutConfig::default();
        let measure = EstimatedMeasure::new(12);
        LayoutEngine::new(&config, &measure)
            .and_then(|engine| engine.compute(document))
            .expect("layout")
    }

    fn two_blocks() -> Document {
        let mut document = Document::new();
        document.insert_block(Block::new(Id::new("a"), ShapeKind::Square));
        document.insert_block(Block::new(Id::new("b"), ShapeKind::Circle));
        document.set_children("root", vec![Id::new("a"), Id::new("b")]);
        document
    }

    #[test]
    fn test_edge_polyline_has_midpoint() {
        let mut document = two_blocks();
        document.push_edge(Edge::new(Id::new("1-a-b"), Id::new("a"), Id::new("b")));
        let geometry = layout(&document);

        let diagram = resolve(&document, &geometry).expect("resolved");
        let edge = &diagram.edges()[0];
        let a = geometry.center("a").expect("a");
        let b = geometry.center("b").expect("b");
        assert_eq!(edge.points(), [a, a.midpoint(b), b]);
    }

    #[test]
    fn test_unresolved_reference() {
        let mut document = two_blocks();
        document.push_edge(Edge::new(Id::new("1-a-z"), Id::new("a"), Id::new("z")));
        let geometry = layout(&document);

        let err = resolve(&document, &geometry).expect_err("z is missing");
        assert!(matches!(
            err,
            TesseraError::UnresolvedReference { ref edge, ref block } if edge == "1-a-z" && block == "z"
        ));
    }

    #[test]
    fn test_unplaced_endpoint_skips_edge() {
        let mut document = two_blocks();
        document.insert_block(Block::new(Id::new("ghost"), ShapeKind::Unknown));
        document.push_edge(Edge::new(Id::new("1-a-ghost"), Id::new("a"), Id::new("ghost")));
        let geometry = layout(&document);

        let diagram = resolve(&document, &geometry).expect("resolved");
        assert!(diagram.edges().is_empty());
        assert!(diagram.block("ghost").is_none());
    }

    #[test]
    fn test_bounds_include_origin_and_skip_root() {
        let document = two_blocks();
        let geometry = layout(&document);
        let diagram = resolve(&document, &geometry).expect("resolved");

        let bounds = diagram.bounds();
        assert!(bounds.min_x() <= 0.0 && bounds.min_y() <= 0.0);
        for block in diagram.blocks() {
            assert!(bounds.contains(block.bounds()));
        }
        assert!(diagram.block("root").is_none());
    }
}
