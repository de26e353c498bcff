//! Sizing pass.
//!
//! Sizing runs in two linear walks. The measure walk is bottom-up and finds
//! the natural size of every composite: all children of one composite share
//! a uniform cell, the widest per-column width and the tallest height among
//! them. A child spanning `n` columns is `n` cells wide plus the `n - 1` gaps
//! between them. The fit walk is top-down: each composite settles its final
//! size against the cell its parent stamped, then stamps its own children.

use std::collections::HashMap;

use log::{debug, trace};

use tessera_core::{geometry::Size, identifier::Id, semantic::Document};

use super::grid::Grid;
use crate::error::LayoutError;

/// Grid shape and natural cell of a measured composite.
#[derive(Debug)]
struct Plan {
    columns: f32,
    rows: f32,
    spans: Vec<usize>,
    cell: Size,
}

/// Computes block sizes into an arena keyed by block id.
pub(super) struct Sizer<'a> {
    document: &'a Document,
    padding: f32,
    sizes: HashMap<Id, Size>,
    plans: HashMap<Id, Plan>,
}

impl<'a> Sizer<'a> {
    /// Starts from the intrinsic sizes of the leaves. Blocks without an
    /// entry are unsized until a parent stamps them.
    pub(super) fn new(document: &'a Document, padding: f32, sizes: HashMap<Id, Size>) -> Self {
        Self {
            document,
            padding,
            sizes,
            plans: HashMap::new(),
        }
    }

    pub(super) fn into_sizes(self) -> HashMap<Id, Size> {
        self.sizes
    }

    /// Sizes `id` and its subtree.
    ///
    /// `hint` is the cell size offered by the parent. An unsized block takes
    /// it as its starting size; a composite whose own grid is narrower than
    /// the hint stretches its children to fill it.
    pub(super) fn size_block(&mut self, id: &Id, hint: Size) -> Result<(), LayoutError> {
        self.measure(id)?;
        self.fit(id, hint);
        Ok(())
    }

    /// Returns the natural size of `id`, recording the plan of every
    /// composite in its subtree. Leaves report their intrinsic size.
    fn measure(&mut self, id: &Id) -> Result<Size, LayoutError> {
        let intrinsic = self.sizes.get(id).copied().unwrap_or_default();

        let document = self.document;
        let Some(block) = document.block(id) else {
            return Ok(intrinsic);
        };
        let children = block.children();
        if children.is_empty() {
            return Ok(intrinsic);
        }

        let spans = self.spans(children);
        let grid = Grid::new(block.columns(), &spans)?;

        let mut cell = Size::default();
        for (child, &span) in children.iter().zip(&spans) {
            let natural = self.measure(child)?;
            if !document.block(child).is_some_and(|b| b.is_space()) {
                cell = cell.max(Size::new(natural.width() / span as f32, natural.height()));
            }
        }

        let plan = Plan {
            columns: grid.columns() as f32,
            rows: grid.rows() as f32,
            spans,
            cell,
        };
        let natural = self.extent(&plan, cell);
        trace!(block = id.as_str(), cell:?, natural:?; "Measured block");
        self.plans.insert(id.clone(), plan);
        Ok(natural)
    }

    /// Settles the final size of `id` and stamps its children.
    ///
    /// Each composite is visited once, after its parent has stamped it.
    fn fit(&mut self, id: &Id, hint: Size) {
        let existing = match self.sizes.get(id) {
            Some(size) if size.width() != 0.0 => *size,
            _ => {
                self.sizes.insert(id.clone(), hint);
                hint
            }
        };

        let Some(plan) = self.plans.remove(id) else {
            return;
        };

        let p = self.padding;
        let columns = plan.columns;
        let rows = plan.rows;
        let mut cell = plan.cell;
        let natural = self.extent(&plan, cell);
        let mut width = natural.width();
        let mut height = natural.height();

        if width < hint.width() {
            debug!(
                block = id.as_str(),
                width,
                hint = hint.width();
                "Stretching block to sibling width"
            );
            width = hint.width();
            height = hint.height();
            cell = Size::new(
                (width - columns * p - p) / columns,
                (height - rows * p - p) / rows,
            );
        }

        if width < existing.width() {
            debug!(
                block = id.as_str(),
                width,
                existing = existing.width();
                "Growing children to fit block"
            );
            width = existing.width();
            cell = cell.with_width((width - columns * p - p) / columns);
        }

        let size = Size::new(width, height);
        trace!(block = id.as_str(), size:?; "Sized block");
        self.sizes.insert(id.clone(), size);

        let document = self.document;
        let Some(block) = document.block(id) else {
            return;
        };
        let children = block.children();
        self.stamp(children, &plan.spans, cell);
        for child in children {
            self.fit(child, cell);
        }
    }

    fn extent(&self, plan: &Plan, cell: Size) -> Size {
        let p = self.padding;
        Size::new(
            plan.columns * (cell.width() + p) + p,
            plan.rows * (cell.height() + p) + p,
        )
    }

    fn spans(&self, children: &[Id]) -> Vec<usize> {
        children
            .iter()
            .map(|child| {
                self.document
                    .block(child)
                    .map_or(1, |block| block.width_in_columns() as usize)
            })
            .collect()
    }

    fn stamp(&mut self, children: &[Id], spans: &[usize], cell: Size) {
        for (child, &span) in children.iter().zip(spans) {
            let size = Size::new(self.span_width(cell.width(), span), cell.height());
            self.sizes.insert(child.clone(), size);
        }
    }

    fn span_width(&self, cell_width: f32, span: usize) -> f32 {
        let span = span as f32;
        cell_width * span + self.padding * (span - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use tessera_core::{semantic::Block, shape::ShapeKind};

    use super::*;

    const P: f32 = 8.0;

    fn document(blocks: &[(&str, ShapeKind, u32, &[&str])], root: &[&str]) -> Document {
        let mut document = Document::new();
        for (id, kind, span, children) in blocks {
            document.insert_block(Block::new(Id::new(id), *kind).with_width_in_columns(*span));
            document.set_children(id, children.iter().map(|c| Id::new(c)).collect());
        }
        document.set_children("root", root.iter().map(|c| Id::new(c)).collect());
        document
    }

    fn size_of(sizes: &HashMap<Id, Size>, id: &str) -> Size {
        *sizes.get(id).expect("block is sized")
    }

    #[test]
    fn test_children_share_cell_size() {
        let document = document(
            &[
                ("a", ShapeKind::Square, 1, &[]),
                ("b", ShapeKind::Square, 1, &[]),
            ],
            &["a", "b"],
        );
        let intrinsic = HashMap::from([
            (Id::new("a"), Size::new(40.0, 20.0)),
            (Id::new("b"), Size::new(10.0, 30.0)),
        ]);

        let mut sizer = Sizer::new(&document, P, intrinsic);
        sizer.size_block(&Id::root(), Size::default()).expect("sized");
        let sizes = sizer.into_sizes();

        assert_eq!(size_of(&sizes, "a"), Size::new(40.0, 30.0));
        assert_eq!(size_of(&sizes, "b"), Size::new(40.0, 30.0));
        assert_eq!(size_of(&sizes, "root"), Size::new(2.0 * 48.0 + P, 38.0 + P));
    }

    #[test]
    fn test_wide_child_width() {
        let document = document(
            &[
                ("a", ShapeKind::Square, 2, &[]),
                ("b", ShapeKind::Square, 1, &[]),
                ("c", ShapeKind::Square, 1, &[]),
            ],
            &["a", "b", "c"],
        );
        let intrinsic = HashMap::from([
            (Id::new("a"), Size::new(40.0, 20.0)),
            (Id::new("b"), Size::new(30.0, 20.0)),
            (Id::new("c"), Size::new(10.0, 20.0)),
        ]);

        let mut sizer = Sizer::new(&document, P, intrinsic);
        sizer.size_block(&Id::root(), Size::default()).expect("sized");
        let sizes = sizer.into_sizes();

        // `a` is 40 wide over two columns, so `b` sets the 30 wide cell.
        assert_approx_eq!(f32, size_of(&sizes, "a").width(), 2.0 * 30.0 + P);
        assert_approx_eq!(f32, size_of(&sizes, "b").width(), 30.0);
        assert_approx_eq!(f32, size_of(&sizes, "root").width(), 4.0 * (30.0 + P) + P);
    }

    #[test]
    fn test_spacers_do_not_widen_cells() {
        let document = document(
            &[
                ("a", ShapeKind::Square, 1, &[]),
                ("s", ShapeKind::Space, 1, &[]),
            ],
            &["a", "s"],
        );
        let intrinsic = HashMap::from([
            (Id::new("a"), Size::new(20.0, 10.0)),
            (Id::new("s"), Size::new(500.0, 500.0)),
        ]);

        let mut sizer = Sizer::new(&document, P, intrinsic);
        sizer.size_block(&Id::root(), Size::default()).expect("sized");
        let sizes = sizer.into_sizes();

        assert_eq!(size_of(&sizes, "s"), Size::new(20.0, 10.0));
    }

    #[test]
    fn test_empty_composite_is_zero_sized() {
        let document = document(&[("g", ShapeKind::Composite, 1, &[])], &["g"]);

        let mut sizer = Sizer::new(&document, P, HashMap::new());
        sizer.size_block(&Id::new("g"), Size::default()).expect("sized");

        assert_eq!(size_of(&sizer.into_sizes(), "g"), Size::default());
    }

    #[test]
    fn test_sibling_fit_then_growth() {
        let document = document(
            &[
                ("g", ShapeKind::Composite, 1, &["a"]),
                ("a", ShapeKind::Square, 1, &[]),
            ],
            &["g"],
        );
        let intrinsic = HashMap::from([
            (Id::new("g"), Size::new(300.0, 40.0)),
            (Id::new("a"), Size::new(20.0, 10.0)),
        ]);

        let mut sizer = Sizer::new(&document, P, intrinsic);
        sizer
            .size_block(&Id::new("g"), Size::new(200.0, 40.0))
            .expect("sized");
        let sizes = sizer.into_sizes();

        // Sibling fit stretches to the 200 hint, growth then restores 300.
        assert_eq!(size_of(&sizes, "g"), Size::new(300.0, 40.0));
        assert_approx_eq!(f32, size_of(&sizes, "a").width(), 300.0 - 2.0 * P);
        assert_approx_eq!(f32, size_of(&sizes, "a").height(), 40.0 - 2.0 * P);
    }

    #[test]
    fn test_sibling_fit_without_growth() {
        let document = document(
            &[
                ("g", ShapeKind::Composite, 1, &["a"]),
                ("a", ShapeKind::Square, 1, &[]),
            ],
            &["g"],
        );
        let intrinsic = HashMap::from([(Id::new("a"), Size::new(20.0, 10.0))]);

        let mut sizer = Sizer::new(&document, P, intrinsic);
        sizer
            .size_block(&Id::new("g"), Size::new(200.0, 40.0))
            .expect("sized");
        let sizes = sizer.into_sizes();

        assert_eq!(size_of(&sizes, "g"), Size::new(200.0, 40.0));
        assert_approx_eq!(f32, size_of(&sizes, "a").width(), 200.0 - 2.0 * P);
    }

    #[test]
    fn test_deep_nesting_sizes_each_level_once() {
        let depth = 40;
        let mut document = Document::new();
        let names: Vec<String> = (0..depth).map(|level| format!("g{level}")).collect();
        document.insert_block(Block::new(Id::new("a"), ShapeKind::Square));
        for (level, name) in names.iter().enumerate() {
            document.insert_block(Block::new(Id::new(name), ShapeKind::Composite));
            let child = names.get(level + 1).map_or("a", String::as_str);
            document.set_children(name, vec![Id::new(child)]);
        }
        document.set_children("root", vec![Id::new("g0")]);
        let intrinsic = HashMap::from([(Id::new("a"), Size::new(20.0, 10.0))]);

        let mut sizer = Sizer::new(&document, P, intrinsic);
        sizer.size_block(&Id::root(), Size::default()).expect("sized");
        let sizes = sizer.into_sizes();

        let levels = (depth + 1) as f32;
        assert_eq!(size_of(&sizes, "a"), Size::new(20.0, 10.0));
        assert_approx_eq!(f32, size_of(&sizes, "g39").width(), 20.0 + 2.0 * P);
        assert_approx_eq!(f32, size_of(&sizes, "root").width(), 20.0 + levels * 2.0 * P);
        assert_approx_eq!(f32, size_of(&sizes, "root").height(), 10.0 + levels * 2.0 * P);
    }

    #[test]
    fn test_short_composite_keeps_natural_height() {
        let document = document(
            &[
                ("t", ShapeKind::Square, 1, &[]),
                ("g", ShapeKind::Composite, 1, &["a"]),
                ("a", ShapeKind::Square, 1, &[]),
            ],
            &["t", "g"],
        );
        let intrinsic = HashMap::from([
            (Id::new("t"), Size::new(20.0, 100.0)),
            (Id::new("a"), Size::new(200.0, 10.0)),
        ]);

        let mut sizer = Sizer::new(&document, P, intrinsic);
        sizer.size_block(&Id::root(), Size::default()).expect("sized");
        let sizes = sizer.into_sizes();

        // `g` sets the cell width, so it is never stretched to the cell height.
        assert_eq!(size_of(&sizes, "t"), Size::new(200.0 + 2.0 * P, 100.0));
        assert_eq!(size_of(&sizes, "g"), Size::new(200.0 + 2.0 * P, 10.0 + 2.0 * P));
    }

    #[test]
    fn test_zero_columns_fails() {
        let mut document = document(&[("a", ShapeKind::Square, 1, &[])], &["a"]);
        if let Some(root) = document.block_mut("root") {
            root.set_columns(0);
        }

        let mut sizer = Sizer::new(&document, P, HashMap::new());
        assert_eq!(
            sizer.size_block(&Id::root(), Size::default()),
            Err(LayoutError::ZeroColumns)
        );
    }
}
