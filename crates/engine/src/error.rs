use std::fmt;

/// Which index a bounds check was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

/// Errors from grid operations.
///
/// Every failing operation leaves its input grid untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Index outside the current grid bounds.
    OutOfRange { axis: Axis, index: usize, len: usize },
    /// Structural operation that needs a column count on a grid with no rows.
    EmptyGrid,
    /// Aggregate over zero elements (or a zero row sum for percentages).
    DivideByZero,
    /// Proximity search over fewer cells than the tie window needs.
    UnderflowWindow { cells: usize },
    /// Increment would exceed the amount type.
    AmountOverflow,
}

impl GridError {
    /// Stable machine-readable code, used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "out_of_range",
            Self::EmptyGrid => "empty_grid",
            Self::DivideByZero => "divide_by_zero",
            Self::UnderflowWindow { .. } => "underflow_window",
            Self::AmountOverflow => "amount_overflow",
        }
    }

    pub(crate) fn row(index: usize, len: usize) -> Self {
        Self::OutOfRange { axis: Axis::Row, index, len }
    }

    pub(crate) fn column(index: usize, len: usize) -> Self {
        Self::OutOfRange { axis: Axis::Column, index, len }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { axis, index, len } => {
                write!(f, "{axis} index {index} out of range (grid has {len})")
            }
            Self::EmptyGrid => write!(f, "grid has no rows"),
            Self::DivideByZero => write!(f, "division by zero"),
            Self::UnderflowWindow { cells } => {
                write!(f, "proximity search needs at least 4 cells, grid has {cells}")
            }
            Self::AmountOverflow => write!(f, "cell amount overflow"),
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            GridError::row(5, 3).to_string(),
            "row index 5 out of range (grid has 3)"
        );
        assert_eq!(
            GridError::UnderflowWindow { cells: 2 }.to_string(),
            "proximity search needs at least 4 cells, grid has 2"
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(GridError::column(1, 0).code(), "out_of_range");
        assert_eq!(GridError::EmptyGrid.code(), "empty_grid");
        assert_eq!(GridError::DivideByZero.code(), "divide_by_zero");
        assert_eq!(GridError::AmountOverflow.code(), "amount_overflow");
    }
}
