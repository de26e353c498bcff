//! Edges between blocks.

use serde::Serialize;

use crate::{identifier::Id, semantic::Direction};

/// Marker drawn at an end of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowKind {
    Point,
    Cross,
    Circle,
    #[default]
    None,
}

impl ArrowKind {
    /// Marker selected by the last character of a link (`-->`, `--x`, `--o`).
    pub fn from_end_char(c: char) -> Self {
        match c {
            '>' => Self::Point,
            'x' => Self::Cross,
            'o' => Self::Circle,
            _ => Self::None,
        }
    }

    /// Marker selected by the optional first character of a link (`<-->`, `x--x`).
    pub fn from_start_char(c: char) -> Self {
        match c {
            '<' => Self::Point,
            'x' => Self::Cross,
            'o' => Self::Circle,
            _ => Self::None,
        }
    }
}

/// Line style of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStroke {
    #[default]
    Normal,
    Thick,
    Dotted,
    Invisible,
}

impl LineStroke {
    /// Classifies link text such as `-->`, `==>`, `-.->` or `~~~`.
    pub fn from_link(link: &str) -> Self {
        let link = link.trim();
        if link.contains("~~~") {
            Self::Invisible
        } else if link.contains("==") {
            Self::Thick
        } else if link.contains('.') {
            Self::Dotted
        } else {
            Self::Normal
        }
    }
}

/// A connection between two blocks.
///
/// Edges live in the document's edge list, never in a composite's children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    id: Id,
    start: Id,
    end: Id,
    label: Option<String>,
    arrow_start: ArrowKind,
    arrow_end: ArrowKind,
    stroke: LineStroke,
    directions: Vec<Direction>,
}

impl Edge {
    pub fn new(id: Id, start: Id, end: Id) -> Self {
        Self {
            id,
            start,
            end,
            label: None,
            arrow_start: ArrowKind::None,
            arrow_end: ArrowKind::Point,
            stroke: LineStroke::Normal,
            directions: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_arrows(mut self, start: ArrowKind, end: ArrowKind) -> Self {
        self.arrow_start = start;
        self.arrow_end = end;
        self
    }

    pub fn with_stroke(mut self, stroke: LineStroke) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_directions(mut self, directions: Vec<Direction>) -> Self {
        self.directions = directions;
        self
    }

    /// Returns the same edge under a different id.
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
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

    /// Directions inherited from the target block.
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }
}
