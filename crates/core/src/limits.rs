//! Input bounds applied at the session boundary.
//!
//! The grid itself accepts any size. These clamps model the numeric inputs of
//! the interface: dimensions are pinned to `[0, max]` and the requested
//! highlight count to `[0, cells - 1]`.

/// Largest grid dimensions a session will generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_rows: usize,
    pub max_columns: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_rows: 100,
            max_columns: 100,
        }
    }
}

impl Limits {
    pub fn clamp_rows(&self, rows: usize) -> usize {
        rows.min(self.max_rows)
    }

    pub fn clamp_columns(&self, columns: usize) -> usize {
        columns.min(self.max_columns)
    }
}

/// Clamp a requested highlight count to `[0, cells - 1]`.
///
/// An empty grid has no valid count above 0.
pub fn clamp_highlight_count(requested: usize, cells: usize) -> usize {
    requested.min(cells.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dimensions() {
        let limits = Limits::default();
        assert_eq!(limits.clamp_rows(0), 0);
        assert_eq!(limits.clamp_rows(100), 100);
        assert_eq!(limits.clamp_rows(101), 100);
        assert_eq!(limits.clamp_columns(5000), 100);

        let small = Limits { max_rows: 3, max_columns: 2 };
        assert_eq!(small.clamp_rows(4), 3);
        assert_eq!(small.clamp_columns(2), 2);
    }

    #[test]
    fn test_clamp_highlight_count() {
        assert_eq!(clamp_highlight_count(3, 10), 3);
        assert_eq!(clamp_highlight_count(10, 10), 9);
        assert_eq!(clamp_highlight_count(5, 1), 0);
        assert_eq!(clamp_highlight_count(5, 0), 0);
    }
}
