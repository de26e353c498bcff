//! Tessera - A block diagram language compiled to laid-out geometry.
//!
//! Parsing, layout, and rendering for `block-beta` diagrams: blocks of typed
//! shapes arranged in nested column grids, joined by edges.
//!
//! The pipeline has three stages:
//!
//! 1. [`DiagramBuilder::parse`] turns source text into a semantic [`Document`].
//! 2. [`DiagramBuilder::layout`] sizes and places every block and resolves
//!    edges into a [`ResolvedDiagram`].
//! 3. [`render::render`] hands the resolved diagram to a [`render::Renderer`].
//!    [`DiagramBuilder::render_svg`] does this with the built-in SVG backend.
//!
//! [`Document`]: semantic::Document

pub mod config;

mod error;
pub mod export;
pub mod layout;
pub mod render;
pub mod resolve;

pub use tessera_core::{color, geometry, identifier, semantic, shape, text};

pub use error::{LayoutError, TesseraError};
pub use resolve::{PlacedBlock, ResolvedDiagram, RoutedEdge};

use log::{debug, info, trace};

use config::AppConfig;
use export::svg::SvgRenderer;
use layout::LayoutEngine;

/// Builder for parsing, laying out and rendering Tessera diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use tessera::{DiagramBuilder, config::AppConfig};
///
/// let source = "block-beta\ncolumns 2\na b c";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Parse source to the semantic model
/// let document = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Size and place every block
/// let diagram = builder.layout(&document)
///     .expect("Failed to lay out");
///
/// // Render to SVG
/// let svg = builder.render_svg(&diagram)
///     .expect("Failed to render");
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source code into a semantic document.
    ///
    /// This runs the lexer, the grammar parser and the document model
    /// builder. The block limit comes from the layout configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Parse`] for lexical, syntax and semantic
    /// errors, carrying the source for snippet rendering.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use tessera::{DiagramBuilder, config::AppConfig};
    ///
    /// let builder = DiagramBuilder::new(AppConfig::default());
    /// let document = builder.parse("block-beta\na --> b")
    ///     .expect("Failed to parse diagram");
    /// assert_eq!(document.edges().len(), 1);
    /// ```
    pub fn parse(&self, source: &str) -> Result<semantic::Document, TesseraError> {
        info!("Parsing diagram");

        let document = tessera_parser::parse(source, self.config.layout().parse_config())
            .map_err(|err| TesseraError::new_parse_error(err, source))?;

        debug!(blocks = document.len(), edges = document.edges().len(); "Diagram parsed successfully");
        trace!(document:?; "Parsed document");

        Ok(document)
    }

    /// Lay out a document and resolve its edges.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Layout`] when a layout precondition fails and
    /// [`TesseraError::UnresolvedReference`] when an edge names a block that
    /// was never declared.
    pub fn layout(&self, document: &semantic::Document) -> Result<ResolvedDiagram, TesseraError> {
        let measure = self.config.text().measure();
        let engine = LayoutEngine::new(self.config.layout(), &*measure)?;
        let geometry = engine.compute(document)?;

        let diagram = resolve::resolve(document, &geometry)?;
        info!(
            width = diagram.bounds().width(),
            height = diagram.bounds().height();
            "Layout calculated"
        );
        Ok(diagram)
    }

    /// Render a resolved diagram to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Config`] for an invalid background color and
    /// [`TesseraError::Export`] if the document cannot be serialized.
    pub fn render_svg(&self, diagram: &ResolvedDiagram) -> Result<String, TesseraError> {
        let background = self
            .config
            .style()
            .background_color()
            .map_err(TesseraError::Config)?;

        let renderer = SvgRenderer::new(diagram, self.config.text(), background);
        let document = render::render(diagram, renderer);

        let mut buffer = Vec::new();
        svg::write(&mut buffer, &document)?;
        let svg = String::from_utf8(buffer).map_err(|err| TesseraError::Export(err.to_string()))?;

        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }
}
