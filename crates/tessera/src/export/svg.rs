//! SVG rendering of resolved diagrams.
//!
//! [`SvgRenderer`] draws every block as an SVG primitive with its label,
//! every edge as a path with arrow markers, and wraps everything in a group
//! translated so the diagram bounds start at the margin.

use log::debug;
use svg::{self, Node, node::Text as SvgText, node::element as svg_element};

use tessera_core::{
    color::Color,
    geometry::{Bounds, Point},
    semantic::{ArrowKind, LineStroke},
    shape::cylinder_cap,
};

use crate::{
    config::TextConfig,
    render::{RenderShape, Renderer},
    resolve::{PlacedBlock, ResolvedDiagram, RoutedEdge},
};

/// Space around the diagram bounds.
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 1.5;
/// Inset of a subroutine's side bars.
const SUBROUTINE_INSET: f32 = 8.0;
/// Gap between the rings of a double circle.
const DOUBLE_CIRCLE_GAP: f32 = 5.0;

const DEFAULT_FILL: &str = "#ECECFF";
const DEFAULT_STROKE: &str = "#9370DB";
const EDGE_COLOR: &str = "#333333";

/// Which end of an edge a marker decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerEnd {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    kind: ArrowKind,
    end: MarkerEnd,
}

impl Marker {
    fn new(kind: ArrowKind, end: MarkerEnd) -> Option<Self> {
        (kind != ArrowKind::None).then_some(Self { kind, end })
    }

    fn id(self) -> String {
        let kind = match self.kind {
            ArrowKind::Point => "point",
            ArrowKind::Cross => "cross",
            ArrowKind::Circle => "circle",
            ArrowKind::None => "none",
        };
        let end = match self.end {
            MarkerEnd::Start => "start",
            MarkerEnd::End => "end",
        };
        format!("tessera-{kind}-{end}")
    }

    fn reference(self) -> String {
        format!("url(#{})", self.id())
    }

    fn element(self) -> svg_element::Marker {
        let ref_x = match self.end {
            MarkerEnd::Start => 1,
            MarkerEnd::End => 9,
        };
        let marker = svg_element::Marker::new()
            .set("id", self.id())
            .set("viewBox", "0 0 10 10")
            .set("refX", ref_x)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto");

        match (self.kind, self.end) {
            (ArrowKind::Point, MarkerEnd::End) => marker.add(
                svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", EDGE_COLOR),
            ),
            (ArrowKind::Point, MarkerEnd::Start) => marker.add(
                svg_element::Path::new()
                    .set("d", "M 10 0 L 0 5 L 10 10 z")
                    .set("fill", EDGE_COLOR),
            ),
            (ArrowKind::Cross, _) => marker.add(
                svg_element::Path::new()
                    .set("d", "M 1 1 L 9 9 M 1 9 L 9 1")
                    .set("stroke", EDGE_COLOR)
                    .set("stroke-width", 2),
            ),
            (ArrowKind::Circle, _) => marker.add(
                svg_element::Circle::new()
                    .set("cx", 5)
                    .set("cy", 5)
                    .set("r", 4)
                    .set("fill", EDGE_COLOR),
            ),
            (ArrowKind::None, _) => marker,
        }
    }
}

/// Renders a [`ResolvedDiagram`] into an [`svg::Document`].
///
/// # Examples
///
/// ```
/// use tessera::{DiagramBuilder, export::svg::SvgRenderer, render};
/// use tessera::config::{AppConfig, LayoutConfig, Measurement, StyleConfig, TextConfig};
///
/// let text = TextConfig::new("Arial", 12, Measurement::Estimate);
/// let config = AppConfig::new(LayoutConfig::default(), text.clone(), StyleConfig::default());
/// let builder = DiagramBuilder::new(config);
///
/// let document = builder.parse("block-beta\na --> b").unwrap();
/// let diagram = builder.layout(&document).unwrap();
///
/// let svg = render::render(&diagram, SvgRenderer::new(&diagram, &text, None));
/// assert!(svg.to_string().contains("tessera-point-end"));
/// ```
pub struct SvgRenderer<'a> {
    diagram: &'a ResolvedDiagram,
    font_family: String,
    font_size: u16,
    background: Option<Color>,
    shapes: Vec<Box<dyn Node>>,
    edges: Vec<Box<dyn Node>>,
    labels: Vec<Box<dyn Node>>,
    markers: Vec<Marker>,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(diagram: &'a ResolvedDiagram, text: &TextConfig, background: Option<Color>) -> Self {
        Self {
            diagram,
            font_family: text.font_family().to_string(),
            font_size: text.font_size(),
            background,
            shapes: Vec::new(),
            edges: Vec::new(),
            labels: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Class declarations followed by the block's own declarations.
    fn block_style(&self, block: &PlacedBlock) -> String {
        block
            .classes()
            .iter()
            .filter_map(|class| self.diagram.classes().get(class))
            .flat_map(|class| class.styles())
            .chain(block.styles())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }

    fn text_style(&self, block: &PlacedBlock) -> String {
        block
            .classes()
            .iter()
            .filter_map(|class| self.diagram.classes().get(class))
            .flat_map(|class| class.text_styles())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }

    fn use_marker(&mut self, marker: Marker) -> String {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        marker.reference()
    }

    fn text(&self, content: &str, center: Point) -> svg_element::Text {
        let lines: Vec<&str> = content.lines().collect();
        let line_height = f32::from(self.font_size) * LINE_HEIGHT;
        let first = center.y() - line_height * (lines.len().saturating_sub(1)) as f32 / 2.0;

        let mut text = svg_element::Text::new("")
            .set("x", center.x())
            .set("y", first)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.font_family.as_str())
            .set("font-size", f32::from(self.font_size));

        for (i, line) in lines.into_iter().enumerate() {
            let tspan = svg_element::TSpan::new("")
                .set("x", center.x())
                .set("y", first + line_height * i as f32)
                .add(SvgText::new(line));
            text = text.add(tspan);
        }
        text
    }

    fn shape(&self, block: &PlacedBlock, shape: RenderShape) -> Box<dyn Node> {
        let center = block.center();
        let size = block.size();
        let bounds = block.bounds();
        let rect = |radius: f32| {
            svg_element::Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", size.width())
                .set("height", size.height())
                .set("rx", radius)
        };
        let polygon = || {
            block
                .kind()
                .outline(size, block.directions())
                .map(|outline| {
                    let points = outline
                        .iter()
                        .map(|p| format!("{},{}", center.x() + p.x(), center.y() + p.y()))
                        .collect::<Vec<_>>()
                        .join(" ");
                    Box::new(svg_element::Polygon::new().set("points", points))
                        as Box<dyn Node>
                })
                .unwrap_or_else(|| Box::new(rect(0.0)))
        };

        match shape {
            RenderShape::Rect { radius } => Box::new(rect(radius)),
            RenderShape::Composite => Box::new(rect(0.0).set("fill-opacity", 0.5)),
            RenderShape::Stadium => Box::new(rect(size.height() / 2.0)),
            RenderShape::Circle => Box::new(
                svg_element::Circle::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("r", size.width().min(size.height()) / 2.0),
            ),
            RenderShape::DoubleCircle => {
                let outer = size.width().min(size.height()) / 2.0;
                let ring = |r: f32| {
                    svg_element::Circle::new()
                        .set("cx", center.x())
                        .set("cy", center.y())
                        .set("r", r)
                };
                Box::new(
                    svg_element::Group::new()
                        .add(ring(outer))
                        .add(ring((outer - DOUBLE_CIRCLE_GAP).max(0.0))),
                )
            }
            RenderShape::Subroutine => {
                let bar = |x: f32| {
                    svg_element::Line::new()
                        .set("x1", x)
                        .set("y1", bounds.min_y())
                        .set("x2", x)
                        .set("y2", bounds.max_y())
                };
                Box::new(
                    svg_element::Group::new()
                        .add(rect(0.0))
                        .add(bar(bounds.min_x() + SUBROUTINE_INSET))
                        .add(bar(bounds.max_x() - SUBROUTINE_INSET)),
                )
            }
            RenderShape::Cylinder => {
                let w = size.width();
                let rx = w / 2.0;
                let ry = cylinder_cap(w);
                let body = size.height() - 2.0 * ry;
                let d = format!(
                    "M {x},{y} a {rx},{ry} 0,0,0 {w},0 a {rx},{ry} 0,0,0 -{w},0 \
                     l 0,{body} a {rx},{ry} 0,0,0 {w},0 l 0,-{body}",
                    x = bounds.min_x(),
                    y = bounds.min_y() + ry,
                );
                Box::new(svg_element::Path::new().set("d", d))
            }
            RenderShape::Question
            | RenderShape::Hexagon
            | RenderShape::LeanLeft
            | RenderShape::LeanRight
            | RenderShape::Trapezoid
            | RenderShape::InvTrapezoid
            | RenderShape::RectLeftInvArrow
            | RenderShape::BlockArrow => polygon(),
        }
    }
}

impl Renderer for SvgRenderer<'_> {
    type Output = svg::Document;

    fn draw_block(&mut self, block: &PlacedBlock, shape: RenderShape) {
        let mut group = svg_element::Group::new()
            .set("id", block.id().as_str())
            .set("class", block.classes().join(" "))
            .set("fill", DEFAULT_FILL)
            .set("stroke", DEFAULT_STROKE);
        let style = self.block_style(block);
        if !style.is_empty() {
            group = group.set("style", style);
        }
        group = group.add(self.shape(block, shape));
        self.shapes.push(Box::new(group));

        if block.label().is_empty() {
            return;
        }
        let anchor = if shape == RenderShape::Composite {
            let top = block.bounds().min_y();
            block
                .center()
                .with_y(top + f32::from(self.font_size) * LINE_HEIGHT / 2.0)
        } else {
            block.center()
        };
        let mut label = self.text(block.label(), anchor).set("fill", EDGE_COLOR);
        let text_style = self.text_style(block);
        if !text_style.is_empty() {
            label = label.set("style", text_style);
        }
        self.labels.push(Box::new(label));
    }

    fn draw_edge(&mut self, edge: &RoutedEdge, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let d = rest.iter().fold(
            format!("M {} {}", first.x(), first.y()),
            |d, point| format!("{d} L {} {}", point.x(), point.y()),
        );

        let mut path = svg_element::Path::new()
            .set("id", edge.id().as_str())
            .set("d", d)
            .set("fill", "none");
        path = match edge.stroke() {
            LineStroke::Normal => path.set("stroke", EDGE_COLOR).set("stroke-width", 2),
            LineStroke::Thick => path.set("stroke", EDGE_COLOR).set("stroke-width", 3.5),
            LineStroke::Dotted => path
                .set("stroke", EDGE_COLOR)
                .set("stroke-width", 2)
                .set("stroke-dasharray", "3"),
            LineStroke::Invisible => path.set("stroke", "none"),
        };

        if edge.stroke() != LineStroke::Invisible {
            if let Some(marker) = Marker::new(edge.arrow_start(), MarkerEnd::Start) {
                path = path.set("marker-start", self.use_marker(marker));
            }
            if let Some(marker) = Marker::new(edge.arrow_end(), MarkerEnd::End) {
                path = path.set("marker-end", self.use_marker(marker));
            }
        }
        self.edges.push(Box::new(path));

        if let (Some(label), Some(middle)) = (edge.label(), points.get(points.len() / 2)) {
            let text = self.text(label, *middle).set("fill", EDGE_COLOR);
            self.labels.push(Box::new(text));
        }
    }

    fn finish(self, bounds: Bounds) -> svg::Document {
        let width = bounds.width() + MARGIN * 2.0;
        let height = bounds.height() + MARGIN * 2.0;
        debug!(width = width, height = height, markers = self.markers.len(); "Finishing SVG document");

        let mut doc = svg::Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        let accessible = [
            ("title", self.diagram.title()),
            ("desc", self.diagram.description()),
        ];
        for (name, content) in accessible {
            if let Some(content) = content {
                let mut element = svg_element::Element::new(name);
                element.append(SvgText::new(content));
                doc = doc.add(element);
            }
        }

        if let Some(color) = self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", color.to_string())
                    .set("fill-opacity", color.alpha()),
            );
        }

        if !self.markers.is_empty() {
            let defs = self
                .markers
                .iter()
                .fold(svg_element::Definitions::new(), |defs, marker| {
                    defs.add(marker.element())
                });
            doc = doc.add(defs);
        }

        let main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                MARGIN - bounds.min_x(),
                MARGIN - bounds.min_y()
            ),
        );
        let main_group = self
            .shapes
            .into_iter()
            .chain(self.edges)
            .chain(self.labels)
            .fold(main_group, |group, node| group.add(node));

        doc.add(main_group)
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::semantic::Document;

    use super::*;
    use crate::{
        config::{LayoutConfig, Measurement},
        layout::LayoutEngine,
        render::render,
        resolve::resolve,
    };

    fn resolved(document: &Document) -> ResolvedDiagram {
        let config = LayoutConfig::default();
        let measure = tessera_core::text::EstimatedMeasure::new(12);
        let geometry = LayoutEngine::new(&config, &measure)
            .and_then(|engine| engine.compute(document))
            .expect("layout");
        resolve(document, &geometry).expect("resolved")
    }

    fn render_source(source: &str, background: Option<Color>) -> String {
        let document =
            tessera_parser::parse(source, tessera_parser::ParseConfig::default()).expect("parse");
        let diagram = resolved(&document);
        let text = TextConfig::new("Arial", 12, Measurement::Estimate);
        render(&diagram, SvgRenderer::new(&diagram, &text, background)).to_string()
    }

    #[test]
    fn test_markers_only_for_used_kinds() {
        let svg = render_source("block-beta\na --> b\nb x--o c", None);
        assert!(svg.contains("tessera-point-end"));
        assert!(svg.contains("tessera-cross-start"));
        assert!(svg.contains("tessera-circle-end"));
        assert!(!svg.contains("tessera-point-start"));
    }

    #[test]
    fn test_styles_and_labels() {
        let svg = render_source(
            "block-beta\na[\"Alpha\"]\nclassDef hot fill:#f96\nclass a hot\nstyle a stroke:#000",
            None,
        );
        assert!(svg.contains("fill:#f96;stroke:#000"));
        assert!(svg.contains("Alpha"));
        assert!(svg.contains("class=\"hot\""));
    }

    #[test]
    fn test_spacers_are_not_drawn() {
        let svg = render_source("block-beta\nspace a", None);
        assert!(!svg.contains("id=\"root-0\""));
        assert!(svg.contains("id=\"a\""));
    }

    #[test]
    fn test_background_and_title() {
        let background = Color::new("white").ok();
        let svg = render_source("block-beta\naccTitle: Overview\na", background);
        assert!(svg.contains("<title>"));
        assert!(svg.contains("Overview"));
        // Background rect plus the block itself.
        assert_eq!(svg.matches("<rect").count(), 2);
    }

    #[test]
    fn test_empty_diagram_has_margins() {
        let document = Document::new();
        let diagram = resolved(&document);
        let text = TextConfig::default();
        let svg = render(&diagram, SvgRenderer::new(&diagram, &text, None)).to_string();
        assert!(svg.contains(&format!("viewBox=\"0 0 {} {}\"", MARGIN * 2.0, MARGIN * 2.0)));
        assert!(!svg.contains("<defs"));
    }
}
