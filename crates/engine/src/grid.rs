//! The matrix store.
//!
//! A `Grid` is a value: every mutation takes `&self` and returns a new grid,
//! so a caller holding the previous version never observes a half-applied
//! change. Rows are addressed by position; removing a row shifts every later
//! row down by one.

use serde::{Deserialize, Serialize};

use crate::cell::{Amount, Cell};
use crate::cell_id::{CellId, IdGenerator};
use crate::error::GridError;

/// One row of cells.
pub type Row = Vec<Cell>;

/// Rectangular grid of cells.
///
/// INVARIANT: every row has the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    /// A grid with no rows.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Fresh grid of `rows` x `columns` zero cells, each with a new id.
    ///
    /// Zero in either dimension is allowed: `generate(0, n)` has no rows,
    /// `generate(n, 0)` has `n` empty rows.
    pub fn generate(rows: usize, columns: usize, ids: &mut impl IdGenerator) -> Self {
        let rows = (0..rows)
            .map(|_| fresh_row(columns, ids))
            .collect();
        Self { rows }
    }

    /// Build a grid from explicit rows. `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Row>) -> Option<Self> {
        let width = rows.first().map(Vec::len);
        if rows.iter().any(|r| Some(r.len()) != width) {
            return None;
        }
        Some(Self { rows })
    }

    /// Lay `amounts` out row-major, `columns` per row, with fresh ids.
    ///
    /// A trailing partial row is discarded. `columns == 0` gives an empty grid.
    pub fn from_amounts(columns: usize, amounts: &[Amount], ids: &mut impl IdGenerator) -> Self {
        if columns == 0 {
            return Self::empty();
        }
        let rows = amounts
            .chunks_exact(columns)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|&amount| Cell::with_amount(ids.next_id(), amount))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count, taken from the first row. `None` when there are no rows.
    pub fn column_count(&self) -> Option<usize> {
        self.rows.first().map(Vec::len)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Result<&Row, GridError> {
        self.rows
            .get(row)
            .ok_or_else(|| GridError::row(row, self.rows.len()))
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        let cells = self.row(row)?;
        cells
            .get(col)
            .ok_or_else(|| GridError::column(col, cells.len()))
    }

    /// All cells in row-major order (row 0 left to right, then row 1, ...).
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().flatten()
    }

    /// Cells in row-major order with their (row, col) positions.
    pub fn positioned_cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, cells)| {
            cells.iter().enumerate().map(move |(c, cell)| (r, c, cell))
        })
    }

    /// Current position of a cell, if it is still in the grid.
    pub fn position_of(&self, id: &CellId) -> Option<(usize, usize)> {
        self.positioned_cells()
            .find(|(_, _, cell)| cell.id() == id)
            .map(|(r, c, _)| (r, c))
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.cells().any(|cell| cell.id() == id)
    }

    // =========================================================================
    // Mutations (return a new grid)
    // =========================================================================

    /// Copy of this grid with the amount at `(row, col)` one greater.
    pub fn increment(&self, row: usize, col: usize) -> Result<Self, GridError> {
        let next = self
            .cell(row, col)?
            .incremented()
            .ok_or(GridError::AmountOverflow)?;

        let mut grid = self.clone();
        grid.rows[row][col] = next;
        Ok(grid)
    }

    /// Copy of this grid with one row of fresh zero cells appended.
    ///
    /// The new row's length is the existing column count, so a grid with no
    /// rows has nothing to copy it from and fails with `EmptyGrid`.
    pub fn add_row(&self, ids: &mut impl IdGenerator) -> Result<Self, GridError> {
        let columns = self.column_count().ok_or(GridError::EmptyGrid)?;

        let mut grid = self.clone();
        grid.rows.push(fresh_row(columns, ids));
        Ok(grid)
    }

    /// Copy of this grid without row `row`. Later rows shift down by one.
    pub fn remove_row(&self, row: usize) -> Result<Self, GridError> {
        self.row(row)?;

        let mut grid = self.clone();
        grid.rows.remove(row);
        Ok(grid)
    }
}

fn fresh_row(columns: usize, ids: &mut impl IdGenerator) -> Row {
    (0..columns).map(|_| Cell::new(ids.next_id())).collect()
}
