//! The document that owns every block, edge and style class of a diagram.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    identifier::Id,
    semantic::{Block, Edge, StyleClass},
    shape::ShapeKind,
};

/// A parsed block diagram.
///
/// The document keeps a flat index from block id to [`Block`] in insertion
/// order. The tree structure is expressed through each composite's child
/// ids, starting at the root composite that every document is created with.
///
/// # Examples
///
/// ```
/// use tessera_core::{
///     identifier::Id,
///     semantic::{Block, Document},
///     shape::ShapeKind,
/// };
///
/// let mut doc = Document::new();
/// assert!(doc.insert_block(Block::new(Id::new("a"), ShapeKind::Square)));
/// doc.set_children(&Id::root(), vec![Id::new("a")]);
///
/// assert_eq!(doc.root().children(), [Id::new("a")]);
/// assert!(doc.contains("a"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    blocks: IndexMap<Id, Block>,
    edges: Vec<Edge>,
    classes: IndexMap<String, StyleClass>,
    title: Option<String>,
    description: Option<String>,
}

impl Document {
    /// Creates a document holding only the root composite.
    pub fn new() -> Self {
        let root = Block::new(Id::root(), ShapeKind::Composite);
        let mut blocks = IndexMap::new();
        blocks.insert(root.id().clone(), root);
        Self {
            blocks,
            edges: Vec::new(),
            classes: IndexMap::new(),
            title: None,
            description: None,
        }
    }

    /// Resets the document to the state returned by [`Document::new`].
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// The root composite.
    pub fn root(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn block_mut(&mut self, id: &str) -> Option<&mut Block> {
        self.blocks.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    /// Registers a block. Returns `false` and leaves the index untouched if
    /// the id is already present.
    pub fn insert_block(&mut self, block: Block) -> bool {
        if self.blocks.contains_key(block.id().as_str()) {
            return false;
        }
        self.blocks.insert(block.id().clone(), block);
        true
    }

    /// Every block, root included, in registration order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Number of registered blocks, root included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; the root is registered on creation.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Child ids of a block, or an empty slice for unknown ids.
    pub fn children(&self, id: &str) -> &[Id] {
        self.blocks.get(id).map_or(&[], |block| block.children())
    }

    /// Replaces the children of a registered block. Unknown ids are ignored.
    pub fn set_children(&mut self, id: &str, children: Vec<Id>) {
        if let Some(block) = self.blocks.get_mut(id) {
            block.set_children(children);
        }
    }

    /// Visits the tree depth-first, parents before children, root excluded.
    pub fn walk(&self) -> Vec<&Block> {
        let mut visited = Vec::new();
        let mut stack: Vec<&Id> = self.root().children().iter().rev().collect();
        while let Some(id) = stack.pop() {
            if let Some(block) = self.blocks.get(id.as_str()) {
                visited.push(block);
                stack.extend(block.children().iter().rev());
            }
        }
        visited
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn classes(&self) -> &IndexMap<String, StyleClass> {
        &self.classes
    }

    pub fn class(&self, id: &str) -> Option<&StyleClass> {
        self.classes.get(id)
    }

    /// Returns the class with the given id, creating an empty one if needed.
    pub fn class_entry(&mut self, id: &str) -> &mut StyleClass {
        self.classes
            .entry(id.to_string())
            .or_insert_with(|| StyleClass::new(id))
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> Block {
        Block::new(Id::new(id), ShapeKind::Square)
    }

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.root().id(), "root");
        assert!(doc.root().is_composite());
        assert_eq!(doc.root().columns(), -1);
    }

    #[test]
    fn test_insert_block_is_first_wins() {
        let mut doc = Document::new();
        assert!(doc.insert_block(leaf("a")));
        assert!(!doc.insert_block(leaf("a").with_label("other")));
        assert_eq!(doc.block("a").unwrap().label(), "a");
    }

    #[test]
    fn test_walk_order() {
        let mut doc = Document::new();
        doc.insert_block(Block::new(Id::new("g"), ShapeKind::Composite));
        doc.insert_block(leaf("a"));
        doc.insert_block(leaf("b"));
        doc.set_children("g", vec![Id::new("a")]);
        doc.set_children("root", vec![Id::new("g"), Id::new("b")]);

        let order: Vec<&str> = doc.walk().iter().map(|b| b.id().as_str()).collect();
        assert_eq!(order, ["g", "a", "b"]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut doc = Document::new();
        doc.insert_block(leaf("a"));
        doc.push_edge(Edge::new(Id::new("1-a-a"), Id::new("a"), Id::new("a")));
        doc.class_entry("c").push_declaration("fill:red");
        doc.set_title("t");

        doc.clear();

        assert_eq!(doc, Document::new());
    }
}
