//! Row and column aggregates.
//!
//! Pure functions over a grid. Zero-element aggregates are reported as
//! `DivideByZero`, never coerced to 0.

use crate::cell::{Amount, Cell};
use crate::error::GridError;
use crate::grid::Grid;

/// Sum of the amounts in `row`.
pub fn row_sum(grid: &Grid, row: usize) -> Result<Amount, GridError> {
    Ok(sum(grid.row(row)?.iter().map(Cell::amount)))
}

/// Mean of column `col` across all rows.
///
/// With no rows there is nothing to average, and that is checked before the
/// column index (a grid without rows has no column count to check against).
pub fn column_average(grid: &Grid, col: usize) -> Result<f64, GridError> {
    let columns = grid.column_count().ok_or(GridError::DivideByZero)?;
    if col >= columns {
        return Err(GridError::column(col, columns));
    }

    let total = sum(grid.rows().iter().map(|r| r[col].amount()));
    Ok(total as f64 / grid.row_count() as f64)
}

/// Averages for every column, `None` where undefined.
pub fn column_averages(grid: &Grid) -> Vec<Option<f64>> {
    let columns = grid.column_count().unwrap_or(0);
    (0..columns)
        .map(|col| column_average(grid, col).ok())
        .collect()
}

/// Share of the row sum held by `(row, col)`, as a rounded whole percentage.
///
/// Rounds half away from zero. A zero row sum has no defined share and fails
/// with `DivideByZero`; the caller picks the fallback display.
pub fn row_percent(grid: &Grid, row: usize, col: usize) -> Result<u64, GridError> {
    let amount = grid.cell(row, col)?.amount();
    let total = row_sum(grid, row)?;
    if total == 0 {
        return Err(GridError::DivideByZero);
    }
    Ok(percent_of(amount, total))
}

/// Percentages for a whole row. Every entry fails together on a zero sum.
pub fn row_percents(grid: &Grid, row: usize) -> Result<Vec<u64>, GridError> {
    let cells = grid.row(row)?;
    let total = row_sum(grid, row)?;
    if total == 0 {
        return Err(GridError::DivideByZero);
    }
    Ok(cells.iter().map(|c| percent_of(c.amount(), total)).collect())
}

fn percent_of(amount: Amount, total: Amount) -> u64 {
    (amount as f64 / total as f64 * 100.0).round() as u64
}

fn sum(amounts: impl Iterator<Item = Amount>) -> Amount {
    amounts.fold(0, Amount::saturating_add)
}
