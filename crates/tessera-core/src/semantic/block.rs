//! Blocks, the nodes of a block diagram.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{identifier::Id, shape::ShapeKind};

/// Column count meaning "as many columns as there are children".
pub const AUTO_COLUMNS: i32 = -1;

/// A direction of a block arrow.
///
/// `X` and `Y` are the two-headed horizontal and vertical variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    X,
    Y,
}

impl Direction {
    /// Returns true if the arrow extends horizontally in this direction.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::X)
    }

    /// Returns true if the arrow extends vertically in this direction.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Y)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            other => Err(format!("unknown direction `{other}`")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the block tree.
///
/// Leaf blocks carry a label and a shape. Composite blocks own an ordered
/// list of child ids and a column count. Spacers occupy grid cells without
/// drawing anything.
///
/// # Examples
///
/// ```
/// use tessera_core::{identifier::Id, semantic::Block, shape::ShapeKind};
///
/// let block = Block::new(Id::new("db"), ShapeKind::Cylinder)
///     .with_label("Database")
///     .with_width_in_columns(2);
///
/// assert_eq!(block.label(), "Database");
/// assert_eq!(block.width_in_columns(), 2);
/// assert!(!block.is_composite());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    id: Id,
    label: String,
    markdown: bool,
    kind: ShapeKind,
    width_in_columns: u32,
    directions: Vec<Direction>,
    children: Vec<Id>,
    columns: i32,
    classes: Vec<String>,
    styles: Vec<String>,
}

impl Block {
    /// Creates a block whose label defaults to its id.
    ///
    /// Composite blocks default to an empty label instead.
    pub fn new(id: Id, kind: ShapeKind) -> Self {
        let label = if kind == ShapeKind::Composite {
            String::new()
        } else {
            id.to_string()
        };
        Self {
            id,
            label,
            markdown: false,
            kind,
            width_in_columns: 1,
            directions: Vec::new(),
            children: Vec::new(),
            columns: AUTO_COLUMNS,
            classes: Vec::new(),
            styles: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Marks the label as coming from a markdown string.
    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// Sets how many grid columns the block spans. Values below one are raised to one.
    pub fn with_width_in_columns(mut self, width: u32) -> Self {
        self.width_in_columns = width.max(1);
        self
    }

    pub fn with_directions(mut self, directions: Vec<Direction>) -> Self {
        self.directions = directions;
        self
    }

    pub fn with_columns(mut self, columns: i32) -> Self {
        self.columns = columns;
        self
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_markdown(&self) -> bool {
        self.markdown
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn width_in_columns(&self) -> u32 {
        self.width_in_columns
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    pub fn children(&self) -> &[Id] {
        &self.children
    }

    /// The explicit column count, or [`AUTO_COLUMNS`].
    pub fn columns(&self) -> i32 {
        self.columns
    }

    /// Names of the style classes applied to this block, in application order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Literal style declarations attached with `style`.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    pub fn is_composite(&self) -> bool {
        self.kind == ShapeKind::Composite
    }

    pub fn is_space(&self) -> bool {
        self.kind == ShapeKind::Space
    }

    pub fn set_kind(&mut self, kind: ShapeKind) {
        self.kind = kind;
    }

    pub fn set_label(&mut self, label: impl Into<String>, markdown: bool) {
        self.label = label.into();
        self.markdown = markdown;
    }

    pub fn set_columns(&mut self, columns: i32) {
        self.columns = columns;
    }

    pub fn set_children(&mut self, children: Vec<Id>) {
        self.children = children;
    }

    pub fn set_width_in_columns(&mut self, width: u32) {
        self.width_in_columns = width.max(1);
    }

    pub fn set_directions(&mut self, directions: Vec<Direction>) {
        self.directions = directions;
    }

    /// Applies a style class, ignoring repeats.
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    pub fn add_style(&mut self, declaration: impl Into<String>) {
        self.styles.push(declaration.into());
    }
}
