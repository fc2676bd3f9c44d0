//! Render model.
//!
//! Turns a session into the wire `Snapshot`: grid amounts, row sums, column
//! averages, highlight flags, and percentages on the focused row.

use tallygrid_engine::aggregate::{column_averages, row_percents, row_sum};
use tallygrid_engine::GridError;
use tallygrid_protocol::{CellView, Percent, RowView, Snapshot};

use crate::session::Session;

pub fn snapshot(session: &Session) -> Snapshot {
    let grid = session.grid();
    let highlight = session.highlight();
    let focus = session.percent_focus();

    let rows = grid
        .rows()
        .iter()
        .enumerate()
        .map(|(index, cells)| {
            let percents = (focus == Some(index)).then(|| focused_percents(session, index));
            RowView {
                index,
                sum: row_sum(grid, index).unwrap_or(0),
                cells: cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| CellView {
                        id: cell.id().to_string(),
                        amount: cell.amount(),
                        highlighted: highlight.contains(cell.id()),
                        percent: percents.as_ref().map(|p| p[col]),
                    })
                    .collect(),
            }
        })
        .collect();

    Snapshot {
        revision: session.revision(),
        rows,
        column_averages: column_averages(grid),
        highlight: highlight.ids().iter().map(|id| id.to_string()).collect(),
        percent_focus: focus,
        highlight_count: session.highlight_count(),
    }
}

/// Percent display for every cell of a row. A zero row sum has no shares, so
/// every cell shows `Undefined`.
fn focused_percents(session: &Session, row: usize) -> Vec<Percent> {
    let width = session.grid().column_count().unwrap_or(0);
    match row_percents(session.grid(), row) {
        Ok(values) => values.into_iter().map(Percent::Value).collect(),
        Err(GridError::DivideByZero) => vec![Percent::Undefined; width],
        Err(e) => {
            log::warn!("percent focus on row {}: {}", row, e);
            vec![Percent::Undefined; width]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionOptions;
    use tallygrid_engine::SequentialIds;

    fn session() -> Session {
        Session::new(SessionOptions {
            ids: Box::new(SequentialIds::new()),
            ..SessionOptions::default()
        })
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = snapshot(&session());
        assert!(snap.rows.is_empty());
        assert!(snap.column_averages.is_empty());
        assert!(snap.highlight.is_empty());
        assert_eq!(snap.revision, 0);
        assert_eq!(snap.column_count(), 0);
    }

    #[test]
    fn test_snapshot_sums_and_averages() {
        let mut s = session();
        s.generate(2, 2);
        s.increment(0, 0).unwrap();
        s.increment(0, 1).unwrap();
        s.increment(0, 1).unwrap();
        s.increment(1, 1).unwrap();

        let snap = snapshot(&s);
        assert_eq!(snap.rows[0].sum, 3);
        assert_eq!(snap.rows[1].sum, 1);
        assert_eq!(snap.column_averages, vec![Some(0.5), Some(1.5)]);
        assert_eq!(snap.rows[1].cells[1].id, "c3");
        assert!(snap.rows.iter().flat_map(|r| &r.cells).all(|c| c.percent.is_none()));
    }

    #[test]
    fn test_snapshot_percent_focus() {
        let mut s = session();
        s.generate(2, 2);
        s.increment(0, 0).unwrap();
        s.increment(0, 1).unwrap();
        s.increment(0, 1).unwrap();
        s.increment(0, 1).unwrap();

        s.set_percent_focus(Some(0)).unwrap();
        let snap = snapshot(&s);
        let row0: Vec<Option<Percent>> = snap.rows[0].cells.iter().map(|c| c.percent).collect();
        assert_eq!(row0, vec![Some(Percent::Value(25)), Some(Percent::Value(75))]);
        assert!(snap.rows[1].cells.iter().all(|c| c.percent.is_none()));

        s.set_percent_focus(Some(1)).unwrap();
        let snap = snapshot(&s);
        assert!(snap.rows[1].cells.iter().all(|c| c.percent == Some(Percent::Undefined)));
        assert_eq!(snap.percent_focus, Some(1));
    }

    #[test]
    fn test_snapshot_highlight_flags() {
        let mut s = session();
        s.generate(1, 5);
        for col in 0..5 {
            for _ in 0..col {
                s.increment(0, col).unwrap();
            }
        }
        s.search(2.0, 1).unwrap();

        let snap = snapshot(&s);
        assert_eq!(snap.highlight, vec!["c2", "c1"]);
        let flags: Vec<bool> = snap.rows[0].cells.iter().map(|c| c.highlighted).collect();
        assert_eq!(flags, vec![false, true, true, false, false]);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut s = session();
        s.generate(1, 1);
        let json = serde_json::to_value(snapshot(&s)).unwrap();
        assert_eq!(json["rows"][0]["cells"][0]["id"], "c0");
        assert_eq!(json["column_averages"][0], 0.0);
        assert_eq!(json["percent_focus"], serde_json::Value::Null);
    }
}
