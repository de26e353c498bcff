//! Grid cells of a composite block.
//!
//! Children fill a composite row-major. [`grid_position`] maps a running
//! column position to a cell; [`Grid`] walks the children of one composite
//! and records the cell each of them starts in.

use tessera_core::semantic::AUTO_COLUMNS;

use crate::error::LayoutError;

/// A column and row index inside a composite's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub column: usize,
    pub row: usize,
}

impl Cell {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// Maps a running position to its grid cell.
///
/// A negative column count means "auto": everything stays on row zero.
///
/// # Errors
///
/// Returns [`LayoutError::ZeroColumns`] for a zero column count and
/// [`LayoutError::NegativePosition`] for a negative position.
///
/// # Examples
///
/// ```
/// use tessera::layout::{Cell, grid_position};
///
/// assert_eq!(grid_position(2, 3), Ok(Cell::new(1, 1)));
/// assert_eq!(grid_position(-1, 7), Ok(Cell::new(7, 0)));
/// assert!(grid_position(0, 1).is_err());
/// ```
pub fn grid_position(columns: i32, position: i64) -> Result<Cell, LayoutError> {
    if columns == 0 {
        return Err(LayoutError::ZeroColumns);
    }
    let position =
        usize::try_from(position).map_err(|_| LayoutError::NegativePosition(position))?;

    let cell = match usize::try_from(columns) {
        Err(_) => Cell::new(position, 0),
        Ok(1) => Cell::new(0, position),
        Ok(columns) => Cell::new(position % columns, position / columns),
    };
    Ok(cell)
}

/// The grid of one composite: its active column count, row count and the
/// starting cell of every child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Lays out children spanning `spans` columns each.
    ///
    /// An explicit column count only applies when it is smaller than the
    /// total span; otherwise all children share one row. The column count
    /// never drops below the widest span, and a child that does not fit in
    /// the rest of its row starts the next one.
    pub fn new(columns: i32, spans: &[usize]) -> Result<Self, LayoutError> {
        if columns == 0 {
            return Err(LayoutError::ZeroColumns);
        }

        let total: usize = spans.iter().sum();
        let widest = spans.iter().copied().max().unwrap_or(1);

        let (active, grid_columns) = match usize::try_from(columns) {
            Ok(explicit) if explicit < total => {
                let active = explicit.max(widest);
                (active, i32::try_from(active).unwrap_or(i32::MAX))
            }
            _ => (total, AUTO_COLUMNS),
        };

        let mut cells = Vec::with_capacity(spans.len());
        let mut position = 0usize;
        for &span in spans {
            let mut cell = grid_position(grid_columns, position as i64)?;
            if grid_columns > 0 && cell.column > 0 && cell.column + span > active {
                position += active - cell.column;
                cell = grid_position(grid_columns, position as i64)?;
            }
            cells.push(cell);
            position += span;
        }

        let rows = cells.last().map_or(0, |cell| cell.row + 1);
        Ok(Self {
            columns: active,
            rows,
            cells,
        })
    }

    /// Number of column units in a row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Starting cell of each child, in child order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
