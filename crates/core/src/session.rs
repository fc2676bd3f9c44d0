//! Interactive grid session.
//!
//! A `Session` is the single owner of the latest grid value plus the
//! transient state a renderer needs: the highlight set, the percent-focus
//! row and the requested highlight size. Commands are applied strictly in
//! call order. A failing command leaves the session exactly as it was, with
//! one documented exception (`press`, see below).

use std::fmt;

use tallygrid_engine::events::{EventLog, GridEvent};
use tallygrid_engine::search::{self, ShortGridPolicy};
use tallygrid_engine::{Axis, CellId, Grid, GridError, IdGenerator, RandomIds};

use crate::highlight::HighlightSet;
use crate::limits::{clamp_highlight_count, Limits};

/// Errors from session commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The grid rejected the operation.
    Grid(GridError),
    /// `add_row` at the row limit.
    RowLimit { max: usize },
}

impl SessionError {
    /// Stable machine-readable code, used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Grid(e) => e.code(),
            Self::RowLimit { .. } => "row_limit",
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "{e}"),
            Self::RowLimit { max } => write!(f, "grid already has the maximum of {max} rows"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::RowLimit { .. } => None,
        }
    }
}

impl From<GridError> for SessionError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

/// Construction parameters for a session.
pub struct SessionOptions {
    pub limits: Limits,
    pub short_grid_policy: ShortGridPolicy,
    /// Initial requested highlight size for `press` and `hover`.
    pub highlight_count: usize,
    pub ids: Box<dyn IdGenerator>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            short_grid_policy: ShortGridPolicy::default(),
            highlight_count: 0,
            ids: Box::new(RandomIds),
        }
    }
}

pub struct Session {
    grid: Grid,
    highlight: HighlightSet,
    percent_focus: Option<usize>,
    highlight_count: usize,
    limits: Limits,
    policy: ShortGridPolicy,
    ids: Box<dyn IdGenerator>,
    revision: u64,
    events: EventLog,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            grid: Grid::empty(),
            highlight: HighlightSet::new(),
            percent_focus: None,
            highlight_count: options.highlight_count,
            limits: options.limits,
            policy: options.short_grid_policy,
            ids: options.ids,
            revision: 0,
            events: EventLog::new(),
        }
    }

    // =========================================================================
    // State out
    // =========================================================================

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn highlight(&self) -> &HighlightSet {
        &self.highlight
    }

    pub fn percent_focus(&self) -> Option<usize> {
        self.percent_focus
    }

    /// Requested highlight count, clamped to the current grid.
    pub fn highlight_count(&self) -> usize {
        clamp_highlight_count(self.highlight_count, self.grid.len())
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn short_grid_policy(&self) -> ShortGridPolicy {
        self.policy
    }

    // =========================================================================
    // Commands in
    // =========================================================================

    /// Replace the grid. Dimensions are clamped to the session limits. The
    /// old highlight set and percent focus refer to cells that no longer
    /// exist, so both are cleared.
    pub fn generate(&mut self, rows: usize, columns: usize) {
        let (r, c) = (self.limits.clamp_rows(rows), self.limits.clamp_columns(columns));
        if (r, c) != (rows, columns) {
            log::info!("generate {}x{} clamped to {}x{}", rows, columns, r, c);
        }

        self.grid = Grid::generate(r, c, &mut self.ids);
        self.highlight.clear();
        self.percent_focus = None;
        self.commit(GridEvent::Generated { rows: r, columns: c });
    }

    pub fn increment(&mut self, row: usize, col: usize) -> Result<(), SessionError> {
        self.grid = self.grid.increment(row, col)?;
        let amount = self.grid.cell(row, col)?.amount();
        self.commit(GridEvent::CellIncremented { row, col, amount });
        Ok(())
    }

    /// Increment a cell, then highlight the cells nearest its new amount.
    ///
    /// The increment stands even if the follow-up query fails (a grid under
    /// the tie window with the `Reject` policy); the highlight set is cleared
    /// in that case and the query error is returned.
    pub fn press(&mut self, row: usize, col: usize) -> Result<(), SessionError> {
        let next = self.grid.increment(row, col)?;
        let amount = next.cell(row, col)?.amount();
        self.grid = next;
        self.revision += 1;
        self.events
            .push(self.revision, GridEvent::CellIncremented { row, col, amount });

        match search::search(&self.grid, amount as f64, self.highlight_count(), self.policy) {
            Ok(ids) => {
                self.set_highlight(ids);
                Ok(())
            }
            Err(e) => {
                self.set_highlight(Vec::new());
                Err(e.into())
            }
        }
    }

    /// Highlight the cells nearest this cell's amount.
    pub fn hover(&mut self, row: usize, col: usize) -> Result<(), SessionError> {
        let amount = self.grid.cell(row, col)?.amount();
        self.query(amount as f64, self.highlight_count())
    }

    /// Highlight the `count` (plus tie adjustment) cells nearest `target`.
    /// `count` is clamped like any interface input.
    pub fn search(&mut self, target: f64, count: usize) -> Result<(), SessionError> {
        self.query(target, clamp_highlight_count(count, self.grid.len()))
    }

    pub fn clear_highlight(&mut self) {
        self.highlight.clear();
        self.commit(GridEvent::HighlightChanged { count: 0 });
    }

    pub fn add_row(&mut self) -> Result<(), SessionError> {
        if self.grid.row_count() >= self.limits.max_rows {
            return Err(SessionError::RowLimit { max: self.limits.max_rows });
        }
        self.grid = self.grid.add_row(&mut self.ids)?;
        self.commit(GridEvent::RowAdded { index: self.grid.row_count() - 1 });
        Ok(())
    }

    /// Remove a row. Highlighted cells from that row are dropped, and the
    /// percent focus follows its row (or clears if its row was removed).
    pub fn remove_row(&mut self, row: usize) -> Result<(), SessionError> {
        self.grid = self.grid.remove_row(row)?;
        self.revision += 1;
        self.events.push(self.revision, GridEvent::RowRemoved { index: row });

        if self.highlight.retain_present(&self.grid) {
            self.events
                .push(self.revision, GridEvent::HighlightChanged { count: self.highlight.len() });
        }

        let focus = match self.percent_focus {
            Some(f) if f == row => None,
            Some(f) if f > row => Some(f - 1),
            other => other,
        };
        if focus != self.percent_focus {
            self.percent_focus = focus;
            self.events
                .push(self.revision, GridEvent::PercentFocusChanged { row: focus });
        }
        Ok(())
    }

    pub fn set_percent_focus(&mut self, row: Option<usize>) -> Result<(), SessionError> {
        if let Some(r) = row {
            if r >= self.grid.row_count() {
                return Err(GridError::OutOfRange {
                    axis: Axis::Row,
                    index: r,
                    len: self.grid.row_count(),
                }
                .into());
            }
        }
        self.percent_focus = row;
        self.commit(GridEvent::PercentFocusChanged { row });
        Ok(())
    }

    /// Store the requested highlight size for `press` and `hover`.
    ///
    /// The request is kept across `generate` and row changes, bounded only by
    /// the largest grid the limits allow; `highlight_count()` clamps it to
    /// the current grid.
    pub fn set_highlight_count(&mut self, count: usize) {
        let largest = self.limits.max_rows.saturating_mul(self.limits.max_columns);
        self.highlight_count = clamp_highlight_count(count, largest);
        self.commit(GridEvent::HighlightCountChanged { count: self.highlight_count });
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn query(&mut self, target: f64, count: usize) -> Result<(), SessionError> {
        let ids = search::search(&self.grid, target, count, self.policy)?;
        self.revision += 1;
        self.set_highlight(ids);
        Ok(())
    }

    /// Replace the highlight set and log it under the current revision.
    fn set_highlight(&mut self, ids: Vec<CellId>) {
        self.highlight = HighlightSet::from_ids(ids);
        self.events
            .push(self.revision, GridEvent::HighlightChanged { count: self.highlight.len() });
    }

    fn commit(&mut self, event: GridEvent) {
        self.revision += 1;
        self.events.push(self.revision, event);
    }
}
