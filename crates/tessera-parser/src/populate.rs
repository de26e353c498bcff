//! Populates a [`Document`] from parsed statements.
//!
//! Statements are consumed in source order. Nodes are registered in the
//! document's flat index the first time they are seen and merged afterwards.
//! A redeclared composite keeps its earlier children and appends the blocks
//! newly placed inside it.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use tessera_core::{
    color::Color,
    identifier::Id,
    semantic::{Block, Document, Edge},
    shape::ShapeKind,
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    parser_types::{EdgeDecl, NodeDecl, Statement},
    span::{Position, Span, Spanned},
};

/// Properties whose values must be CSS colors.
const COLOR_PROPERTIES: &[&str] = &["fill", "stroke", "color", "background", "background-color"];

/// Limits applied while populating a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    max_blocks: usize,
}

impl ParseConfig {
    /// Default upper bound on the number of blocks in one document.
    pub const DEFAULT_MAX_BLOCKS: usize = 10_000;

    pub fn new(max_blocks: usize) -> Self {
        Self { max_blocks }
    }

    /// Maximum number of blocks, the implicit root excluded.
    pub fn max_blocks(&self) -> usize {
        self.max_blocks
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_BLOCKS)
    }
}

pub(crate) struct DocumentBuilder<'a> {
    config: ParseConfig,
    source: &'a str,
    document: Document,
    edge_occurrences: HashMap<String, usize>,
    spacer_counters: HashMap<Id, usize>,
    /// Blocks already listed in some composite's children.
    placed: HashSet<Id>,
    /// Composites whose bodies are being populated, outermost first.
    open: Vec<Id>,
}

impl<'a> DocumentBuilder<'a> {
    pub(crate) fn new(config: ParseConfig, source: &'a str) -> Self {
        Self {
            config,
            source,
            document: Document::new(),
            edge_occurrences: HashMap::new(),
            spacer_counters: HashMap::new(),
            placed: HashSet::new(),
            open: Vec::new(),
        }
    }

    pub(crate) fn build(mut self, statements: Vec<Spanned<Statement>>) -> Result<Document> {
        self.populate(statements, &Id::root())?;
        debug!(
            blocks = self.document.len(),
            edges = self.document.edges().len();
            "Populated document"
        );
        Ok(self.document)
    }

    fn populate(&mut self, statements: Vec<Spanned<Statement>>, parent: &Id) -> Result<()> {
        let mut children = Vec::new();

        for statement in statements {
            let span = statement.span();
            match statement.into_inner() {
                Statement::ClassDef { id, declarations } => {
                    let declarations = self.parse_declarations(&declarations, span)?;
                    let class = self.document.class_entry(&id);
                    for declaration in declarations {
                        class.push_declaration(declaration);
                    }
                }
                Statement::ApplyClass { ids, class } => self.apply_class(&ids, &class, span)?,
                Statement::ApplyStyles { ids, declarations } => {
                    self.apply_styles(&ids, &declarations, span)?
                }
                Statement::Columns(columns) => {
                    if let Some(block) = self.document.block_mut(parent) {
                        block.set_columns(columns);
                    }
                }
                Statement::Edge(edge) => self.add_edge(edge),
                Statement::AccTitle(title) => self.document.set_title(title),
                Statement::AccDescription(description) => {
                    self.document.set_description(description)
                }
                Statement::Space { width } => {
                    self.add_spacers(parent, width, span, &mut children)?
                }
                Statement::Node(node) => {
                    let id = self.add_node(node, span)?;
                    self.check_not_enclosing(&id, span)?;
                    self.place(id, &mut children);
                }
                Statement::Composite {
                    node,
                    children: nested,
                } => {
                    let id = self.add_node(node, span)?;
                    self.check_not_enclosing(&id, span)?;
                    self.open.push(id.clone());
                    self.populate(nested, &id)?;
                    self.open.pop();
                    self.place(id, &mut children);
                }
            }
        }

        let mut all = self.document.children(parent).to_vec();
        all.extend(children);
        self.document.set_children(parent, all);
        Ok(())
    }

    /// Fails when `id` is the composite being populated or one of its ancestors.
    fn check_not_enclosing(&self, id: &Id, span: Span) -> Result<()> {
        if self.open.contains(id) {
            return Err(self
                .diagnostic(format!("block `{id}` is nested inside itself"), span)
                .with_code(ErrorCode::E205)
                .with_help(format!("give the inner block an id other than `{id}`")));
        }
        Ok(())
    }

    fn place(&mut self, id: Id, children: &mut Vec<Id>) {
        if self.placed.insert(id.clone()) {
            children.push(id);
        }
    }

    /// Registers a node or merges it into an earlier declaration.
    fn add_node(&mut self, node: NodeDecl, span: Span) -> Result<Id> {
        let (label, markdown) = match node.label {
            Some(label) => (label.text, label.markdown),
            None if node.shape == ShapeKind::Composite => (String::new(), false),
            None => (node.id.clone(), false),
        };

        if let Some(existing) = self.document.block_mut(&node.id) {
            if node.shape != ShapeKind::Unknown {
                existing.set_kind(node.shape);
            }
            if label != node.id {
                existing.set_label(label, markdown);
            }
            return Ok(existing.id().clone());
        }

        self.reserve(1, span)?;
        let id = Id::new(&node.id);
        let block = Block::new(id.clone(), node.shape)
            .with_label(label)
            .with_markdown(markdown)
            .with_width_in_columns(node.width_in_columns)
            .with_directions(node.directions);
        self.document.insert_block(block);
        Ok(id)
    }

    /// Expands `space:W` into W spacer cells named after the parent.
    fn add_spacers(
        &mut self,
        parent: &Id,
        width: usize,
        span: Span,
        children: &mut Vec<Id>,
    ) -> Result<()> {
        self.reserve(width, span)?;
        for _ in 0..width {
            let id = self.next_spacer_id(parent);
            self.document.insert_block(Block::new(id.clone(), ShapeKind::Space));
            self.place(id, children);
        }
        Ok(())
    }

    fn next_spacer_id(&mut self, parent: &Id) -> Id {
        let counter = self.spacer_counters.entry(parent.clone()).or_insert(0);
        loop {
            let id = parent.suffixed(*counter);
            *counter += 1;
            if !self.document.contains(&id) {
                return id;
            }
        }
    }

    fn add_edge(&mut self, edge: EdgeDecl) {
        let base = format!("{}-{}", edge.start, edge.end);
        let occurrence = self.edge_occurrences.entry(base.clone()).or_insert(0);
        *occurrence += 1;
        let id = Id::new(&format!("{occurrence}-{base}"));

        let edge = Edge::new(id, Id::new(&edge.start), Id::new(&edge.end))
            .with_label(edge.label.map(|label| label.text))
            .with_arrows(edge.arrow_start, edge.arrow_end)
            .with_stroke(edge.stroke)
            .with_directions(edge.directions);
        self.document.push_edge(edge);
    }

    /// Attaches a class to each listed block, creating placeholders for unseen ids.
    fn apply_class(&mut self, ids: &str, class: &str, span: Span) -> Result<()> {
        for id in split_ids(ids) {
            if !self.document.contains(id) {
                self.reserve(1, span)?;
                self.document
                    .insert_block(Block::new(Id::new(id), ShapeKind::Unknown));
            }
            if let Some(block) = self.document.block_mut(id) {
                block.add_class(class);
            }
        }
        Ok(())
    }

    fn apply_styles(&mut self, ids: &str, declarations: &str, span: Span) -> Result<()> {
        let declarations = self.parse_declarations(declarations, span)?;
        for id in split_ids(ids) {
            if !self.document.contains(id) {
                return Err(self
                    .diagnostic(format!("style target `{id}` is not declared"), span)
                    .with_code(ErrorCode::E202)
                    .with_help(format!("declare `{id}` before styling it")));
            }
            if let Some(block) = self.document.block_mut(id) {
                for declaration in &declarations {
                    block.add_style(declaration.clone());
                }
            }
        }
        Ok(())
    }

    /// Splits `fill:#f9f,stroke:#333;` into normalized `property:value` pairs.
    fn parse_declarations(&self, raw: &str, span: Span) -> Result<Vec<String>> {
        let mut declarations = Vec::new();
        for part in raw.split(',') {
            let part = part.split(';').next().unwrap_or_default().trim();
            if part.is_empty() {
                continue;
            }
            let Some((property, value)) = part.split_once(':') else {
                return Err(self
                    .diagnostic(format!("malformed declaration `{part}`"), span)
                    .with_code(ErrorCode::E200)
                    .with_help("declarations have the form `property:value`"));
            };
            let (property, value) = (property.trim(), value.trim());
            if COLOR_PROPERTIES.contains(&property) {
                Color::new(value).map_err(|err| {
                    self.diagnostic(
                        format!("invalid color `{}` for `{property}`", err.input()),
                        span,
                    )
                    .with_code(ErrorCode::E201)
                })?;
            }
            declarations.push(format!("{property}:{value}"));
        }
        Ok(declarations)
    }

    /// Fails when `additional` more blocks would exceed the configured maximum.
    fn reserve(&self, additional: usize, span: Span) -> Result<()> {
        // The root composite is not counted.
        let current = self.document.len().saturating_sub(1);
        if additional > self.config.max_blocks().saturating_sub(current) {
            warn!(current, additional, max = self.config.max_blocks(); "Block limit exceeded");
            return Err(self
                .diagnostic(
                    format!(
                        "document exceeds the limit of {} blocks",
                        self.config.max_blocks()
                    ),
                    span,
                )
                .with_code(ErrorCode::E203)
                .with_help("raise `layout.max_blocks` or split the diagram"));
        }
        Ok(())
    }

    fn diagnostic(&self, message: String, span: Span) -> Diagnostic {
        Diagnostic::error(message)
            .with_label(span, "in this statement")
            .with_position(Position::locate(self.source, span.start()))
    }
}

fn split_ids(ids: &str) -> impl Iterator<Item = &str> {
    ids.split(',').map(str::trim).filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_types::Label;

    fn spanned(statement: Statement) -> Spanned<Statement> {
        Spanned::new(statement, Span::new(0..1))
    }

    fn node(id: &str) -> Statement {
        Statement::Node(NodeDecl::new(id))
    }

    fn build(statements: Vec<Statement>) -> Result<Document> {
        DocumentBuilder::new(ParseConfig::default(), "x")
            .build(statements.into_iter().map(spanned).collect())
    }

    #[test]
    fn test_label_defaults_to_id() {
        let document = build(vec![node("a")]).unwrap();
        assert_eq!(document.block("a").unwrap().label(), "a");
        assert_eq!(document.children("root"), ["a"]);
    }

    #[test]
    fn test_composite_label_defaults_to_empty() {
        let mut header = NodeDecl::new("g");
        header.shape = ShapeKind::Composite;
        let document = build(vec![Statement::Composite {
            node: header,
            children: vec![spanned(node("x"))],
        }])
        .unwrap();

        let group = document.block("g").unwrap();
        assert_eq!(group.label(), "");
        assert_eq!(group.children(), ["x"]);
        assert_eq!(document.children("root"), ["g"]);
    }

    fn composite(id: &str, children: Vec<Statement>) -> Statement {
        let mut header = NodeDecl::new(id);
        header.shape = ShapeKind::Composite;
        Statement::Composite {
            node: header,
            children: children.into_iter().map(spanned).collect(),
        }
    }

    #[test]
    fn test_redeclared_composite_appends_children() {
        let document = build(vec![
            composite("g", vec![node("a")]),
            composite("g", vec![node("c")]),
        ])
        .unwrap();

        assert_eq!(document.children("g"), ["a", "c"]);
        assert_eq!(document.children("root"), ["g"]);
    }

    #[test]
    fn test_composite_nested_in_itself_is_rejected() {
        let err = build(vec![composite("a", vec![node("a")])]).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E205));
        assert_eq!(err.message(), "block `a` is nested inside itself");
    }

    #[test]
    fn test_composite_nested_in_descendant_is_rejected() {
        let err = build(vec![composite(
            "outer",
            vec![composite("inner", vec![composite("outer", vec![])])],
        )])
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E205));
    }

    #[test]
    fn test_redeclaration_merges_kind_and_label() {
        let mut labelled = NodeDecl::new("a");
        labelled.shape = ShapeKind::Round;
        labelled.label = Some(Label {
            text: "Alpha".to_string(),
            markdown: false,
        });
        let document = build(vec![node("a"), Statement::Node(labelled), node("a")]).unwrap();

        let block = document.block("a").unwrap();
        assert_eq!(block.kind(), ShapeKind::Round);
        assert_eq!(block.label(), "Alpha");
        assert_eq!(document.children("root"), ["a"]);
    }

    #[test]
    fn test_spacers_take_parent_names() {
        let document = build(vec![Statement::Space { width: 2 }, Statement::Space { width: 1 }])
            .unwrap();
        assert_eq!(document.children("root"), ["root-0", "root-1", "root-2"]);
        assert!(document.blocks().filter(|b| b.is_space()).count() == 3);
    }

    #[test]
    fn test_edge_occurrences_are_counted() {
        let edge = EdgeDecl {
            start: "a".to_string(),
            end: "b".to_string(),
            label: None,
            arrow_start: Default::default(),
            arrow_end: Default::default(),
            stroke: Default::default(),
            directions: Vec::new(),
        };
        let document = build(vec![
            node("a"),
            Statement::Edge(edge.clone()),
            node("b"),
            Statement::Edge(edge),
        ])
        .unwrap();

        let ids: Vec<&str> = document.edges().iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, ["1-a-b", "2-a-b"]);
    }

    #[test]
    fn test_declarations_are_normalized() {
        let builder = DocumentBuilder::new(ParseConfig::default(), "x");
        let declarations = builder
            .parse_declarations("fill: #f9f ,stroke:#333;, ,stroke-width:4px", Span::new(0..1))
            .unwrap();
        assert_eq!(declarations, ["fill:#f9f", "stroke:#333", "stroke-width:4px"]);
    }

    #[test]
    fn test_missing_colon_is_rejected() {
        let builder = DocumentBuilder::new(ParseConfig::default(), "x");
        let err = builder
            .parse_declarations("fill", Span::new(0..1))
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E200));
    }

    #[test]
    fn test_limit_counts_requested_blocks() {
        let err = DocumentBuilder::new(ParseConfig::new(2), "x")
            .build(vec![spanned(Statement::Space { width: 3 })])
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E203));
    }
}
