//! TallyGrid command protocol (JSONL wire format)
//!
//! This crate defines the canonical types exchanged between a grid session and
//! whatever drives it (the `tgrid` CLI, tests, a future UI). One JSON object
//! per line in each direction.
//!
//! # Protocol Version
//!
//! This is **protocol v1**. Changes to field names or tags require a bump of
//! [`PROTOCOL_VERSION`].
//!
//! # Usage
//!
//! ```ignore
//! use tallygrid_protocol::{Request, Response};
//!
//! let req: Request = serde_json::from_str(r#"{"cmd":"generate","rows":2,"columns":3}"#)?;
//! let line = serde_json::to_string(&response)?;
//! ```

use serde::{Deserialize, Serialize};

pub use tallygrid_engine::events::{GridEvent, Revisioned};

/// Current protocol version. Increment for breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

// =============================================================================
// Driver → Session
// =============================================================================

/// One command line, with an optional correlation id echoed in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub command: Command,
}

impl From<Command> for Request {
    fn from(command: Command) -> Self {
        Self { id: None, command }
    }
}

/// Commands a session understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Replace the grid with a fresh `rows` x `columns` one.
    Generate { rows: usize, columns: usize },
    /// Count one up at a cell.
    Increment { row: usize, col: usize },
    /// Count one up, then highlight the cells closest to the new amount.
    Press { row: usize, col: usize },
    /// Highlight the cells closest to this cell's amount.
    Hover { row: usize, col: usize },
    /// Highlight the cells closest to an explicit target.
    Search { target: f64, count: usize },
    /// Drop the highlight set.
    ClearHighlight,
    /// Append a row of zero cells.
    AddRow,
    /// Remove a row by index.
    RemoveRow { row: usize },
    /// Show percentages on a row, or `null` to go back to raw amounts.
    SetPercentFocus {
        #[serde(default)]
        row: Option<usize>,
    },
    /// Requested highlight size used by `press` and `hover`.
    SetHighlightCount { count: usize },
    /// Read the current render state.
    Snapshot,
}

// =============================================================================
// Session → Driver
// =============================================================================

/// Reply to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok(OkMessage),
    Error(ErrorMessage),
}

impl Response {
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }
}

/// Command applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub revision: u64,
    /// What the command changed, under its revision. Empty for `snapshot`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Revisioned>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,
}

/// Command rejected. Session state is unchanged unless noted by the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// e.g. "out_of_range", "empty_grid", "underflow_window", "parse_error"
    pub code: String,
    pub message: String,
    pub revision: u64,
}

// =============================================================================
// Render state
// =============================================================================

/// Everything a renderer needs to draw the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub revision: u64,
    pub rows: Vec<RowView>,
    /// One entry per column; `null` when the grid has no rows.
    pub column_averages: Vec<Option<f64>>,
    /// Highlighted cell ids, in proximity order.
    pub highlight: Vec<String>,
    pub percent_focus: Option<usize>,
    pub highlight_count: usize,
}

impl Snapshot {
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, |r| r.cells.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowView {
    pub index: usize,
    pub sum: u64,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub id: String,
    pub amount: u64,
    pub highlighted: bool,
    /// Present only on the percent-focus row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Percent>,
}

/// Share of the row sum shown instead of the raw amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Percent {
    Value(u64),
    /// The row sums to zero.
    Undefined,
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Percent::Value(v) => write!(f, "{}%", v),
            Percent::Undefined => f.write_str("NaN%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_commands() {
        let cases = [
            (r#"{"cmd":"generate","rows":2,"columns":3}"#, Command::Generate { rows: 2, columns: 3 }),
            (r#"{"cmd":"press","row":0,"col":1}"#, Command::Press { row: 0, col: 1 }),
            (r#"{"cmd":"search","target":2,"count":1}"#, Command::Search { target: 2.0, count: 1 }),
            (r#"{"cmd":"clear_highlight"}"#, Command::ClearHighlight),
            (r#"{"cmd":"add_row"}"#, Command::AddRow),
            (r#"{"cmd":"set_percent_focus","row":1}"#, Command::SetPercentFocus { row: Some(1) }),
            (r#"{"cmd":"set_percent_focus","row":null}"#, Command::SetPercentFocus { row: None }),
            (r#"{"cmd":"set_percent_focus"}"#, Command::SetPercentFocus { row: None }),
            (r#"{"cmd":"snapshot"}"#, Command::Snapshot),
        ];
        for (line, expected) in cases {
            let req: Request = serde_json::from_str(line).unwrap();
            assert_eq!(req.command, expected, "{}", line);
            assert_eq!(req.id, None);
        }
    }

    #[test]
    fn test_request_id_roundtrip() {
        let req: Request = serde_json::from_str(r#"{"id":"7","cmd":"remove_row","row":3}"#).unwrap();
        assert_eq!(req.id.as_deref(), Some("7"));
        assert_eq!(req.command, Command::RemoveRow { row: 3 });

        let out = serde_json::to_value(&req).unwrap();
        assert_eq!(out, json!({"id": "7", "cmd": "remove_row", "row": 3}));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(serde_json::from_str::<Request>(r#"{"cmd":"undo"}"#).is_err());
        assert!(serde_json::from_str::<Request>(r#"{"cmd":"increment","row":0}"#).is_err());
    }

    #[test]
    fn test_response_shapes() {
        let ok = Response::Ok(OkMessage { id: None, revision: 3, events: vec![], snapshot: None });
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"type": "ok", "revision": 3}));

        let err = Response::Error(ErrorMessage {
            id: Some("a".into()),
            code: "empty_grid".into(),
            message: "grid has no rows".into(),
            revision: 0,
        });
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"type": "error", "id": "a", "code": "empty_grid", "message": "grid has no rows", "revision": 0})
        );
    }

    #[test]
    fn test_ok_carries_events() {
        let ok = Response::Ok(OkMessage {
            id: None,
            revision: 2,
            events: vec![Revisioned { revision: 2, event: GridEvent::RowAdded { index: 1 } }],
            snapshot: None,
        });
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["events"], json!([{"revision": 2, "event": "row_added", "index": 1}]));

        let back: Response = serde_json::from_value(value).unwrap();
        assert_eq!(back, ok);
    }

    #[test]
    fn test_percent_wire_format() {
        assert_eq!(serde_json::to_value(Percent::Value(25)).unwrap(), json!({"value": 25}));
        assert_eq!(serde_json::to_value(Percent::Undefined).unwrap(), json!("undefined"));
        assert_eq!(Percent::Value(25).to_string(), "25%");
        assert_eq!(Percent::Undefined.to_string(), "NaN%");
    }

    #[test]
    fn test_cell_view_omits_percent() {
        let cell = CellView { id: "c0".into(), amount: 2, highlighted: false, percent: None };
        assert_eq!(
            serde_json::to_value(&cell).unwrap(),
            json!({"id": "c0", "amount": 2, "highlighted": false})
        );
    }
}
