//! Top-down positioning pass.
//!
//! Children are placed left to right in their grid rows. A horizontal cursor
//! advances by each child's width plus padding and returns to the left edge
//! of the parent on every new row. Rows share one pitch, so a child shorter
//! than its row is centered in the row's cell.

use std::collections::HashMap;

use log::trace;

use tessera_core::{
    geometry::{Point, Size},
    identifier::Id,
    semantic::Document,
};

use super::grid::Grid;
use crate::error::LayoutError;

pub(super) struct Placer<'a> {
    document: &'a Document,
    padding: f32,
    sizes: &'a HashMap<Id, Size>,
    centers: HashMap<Id, Point>,
}

impl<'a> Placer<'a> {
    pub(super) fn new(document: &'a Document, padding: f32, sizes: &'a HashMap<Id, Size>) -> Self {
        Self {
            document,
            padding,
            sizes,
            centers: HashMap::new(),
        }
    }

    pub(super) fn into_centers(self) -> HashMap<Id, Point> {
        self.centers
    }

    /// Centers the root at the origin and places the whole tree.
    pub(super) fn place_root(&mut self) -> Result<(), LayoutError> {
        let root = Id::root();
        self.centers.insert(root.clone(), Point::default());
        self.place_children(&root, -self.padding)
    }

    /// Places the children of `id`, whose own center is already known.
    ///
    /// `left` is where the cursor of every row starts.
    fn place_children(&mut self, id: &Id, left: f32) -> Result<(), LayoutError> {
        let document = self.document;
        let Some(block) = document.block(id) else {
            return Ok(());
        };
        let children = block.children();
        if children.is_empty() {
            return Ok(());
        }

        let spans: Vec<usize> = children
            .iter()
            .map(|child| {
                document
                    .block(child)
                    .map_or(1, |block| block.width_in_columns() as usize)
            })
            .collect();
        let grid = Grid::new(block.columns(), &spans)?;

        let center = self.centers.get(id).copied().unwrap_or_default();
        let size = self.size(id);
        let top = center.y() - size.height() / 2.0;
        let p = self.padding;
        let cell_height = self.cell_height(children);

        let mut cursor = left;
        let mut row = 0;
        for (child, cell) in children.iter().zip(grid.cells()) {
            if cell.row != row {
                row = cell.row;
                cursor = left;
            }

            let child_size = self.size(child);
            let half_width = child_size.width() / 2.0;
            let x = cursor + p + half_width;
            cursor = x + half_width;
            let y = top + cell.row as f32 * (cell_height + p) + cell_height / 2.0 + p;

            let child_center = Point::new(x, y);
            trace!(
                block = child.as_str(),
                column = cell.column,
                row = cell.row,
                center:? = child_center;
                "Placed block"
            );
            self.centers.insert(child.clone(), child_center);

            self.place_children(child, x - half_width)?;
        }
        Ok(())
    }

    /// Row pitch of a composite: the tallest of its non-spacer children.
    fn cell_height(&self, children: &[Id]) -> f32 {
        children
            .iter()
            .filter(|child| !self.document.block(child).is_some_and(|b| b.is_space()))
            .map(|child| self.size(child).height())
            .fold(0.0, f32::max)
    }

    fn size(&self, id: &Id) -> Size {
        self.sizes.get(id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use tessera_core::{geometry::Bounds, semantic::Block, shape::ShapeKind};

    use super::*;

    const P: f32 = 8.0;

    #[test]
    fn test_rows_wrap_and_cursor_resets() {
        let mut document = Document::new();
        let ids: Vec<Id> = ["a", "b", "c"].into_iter().map(Id::new).collect();
        for id in &ids {
            document.insert_block(Block::new(id.clone(), ShapeKind::Square));
        }
        document.set_children("root", ids.clone());
        if let Some(root) = document.block_mut("root") {
            root.set_columns(2);
        }

        let cell = Size::new(40.0, 20.0);
        let mut sizes: HashMap<Id, Size> = ids.iter().map(|id| (id.clone(), cell)).collect();
        let root_size = Size::new(2.0 * (40.0 + P) + P, 2.0 * (20.0 + P) + P);
        sizes.insert(Id::root(), root_size);

        let mut placer = Placer::new(&document, P, &sizes);
        placer.place_root().expect("placed");
        let centers = placer.into_centers();

        let top = -root_size.height() / 2.0;
        let a = centers["a"];
        let b = centers["b"];
        let c = centers["c"];
        assert_approx_eq!(f32, a.x(), 20.0);
        assert_approx_eq!(f32, b.x(), 20.0 + 40.0 + P);
        assert_approx_eq!(f32, c.x(), a.x());
        assert_approx_eq!(f32, a.y(), top + 10.0 + P);
        assert_approx_eq!(f32, c.y(), top + 20.0 + P + 10.0 + P);
    }

    #[test]
    fn test_nested_composite_starts_at_left_edge() {
        let mut document = Document::new();
        document.insert_block(Block::new(Id::new("g"), ShapeKind::Composite));
        document.insert_block(Block::new(Id::new("a"), ShapeKind::Square));
        document.set_children("g", vec![Id::new("a")]);
        document.set_children("root", vec![Id::new("g")]);

        let sizes = HashMap::from([
            (Id::root(), Size::new(72.0, 52.0)),
            (Id::new("g"), Size::new(56.0, 36.0)),
            (Id::new("a"), Size::new(40.0, 20.0)),
        ]);

        let mut placer = Placer::new(&document, P, &sizes);
        placer.place_root().expect("placed");
        let centers = placer.into_centers();

        let g = centers["g"];
        let a = centers["a"];
        assert_approx_eq!(f32, g.x(), 28.0);
        // The cursor of `g` starts at its left edge, `a` sits one padding in.
        assert_approx_eq!(f32, a.x(), 0.0 + P + 20.0);
        assert_approx_eq!(f32, a.y(), g.y() - 18.0 + 10.0 + P);
    }

    #[test]
    fn test_short_child_centered_below_tall_row() {
        let mut document = Document::new();
        document.insert_block(Block::new(Id::new("t"), ShapeKind::Square));
        document.insert_block(Block::new(Id::new("g"), ShapeKind::Composite));
        document.set_children("root", vec![Id::new("t"), Id::new("g")]);
        if let Some(root) = document.block_mut("root") {
            root.set_columns(1);
        }

        let sizes = HashMap::from([
            (Id::root(), Size::new(216.0, 2.0 * (100.0 + P) + P)),
            (Id::new("t"), Size::new(200.0, 100.0)),
            (Id::new("g"), Size::new(200.0, 26.0)),
        ]);

        let mut placer = Placer::new(&document, P, &sizes);
        placer.place_root().expect("placed");
        let centers = placer.into_centers();

        let t = Bounds::new_from_center(centers["t"], sizes["t"]);
        let g = Bounds::new_from_center(centers["g"], sizes["g"]);
        assert!(g.min_y() >= t.max_y() + P);
        assert_approx_eq!(f32, centers["g"].y(), t.max_y() + P + 50.0);
    }
}
