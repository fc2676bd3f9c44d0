//! Plain-text rendering for `tgrid show` and `tgrid search`.

use tallygrid_engine::search::SearchOutcome;
use tallygrid_protocol::{CellView, Snapshot};
use unicode_width::UnicodeWidthStr;

/// Marker appended to highlighted cells and selected ranks.
pub const HIGHLIGHT_MARK: &str = "*";

/// The grid as an aligned text table.
///
/// ```text
///         Column 1  Column 2  Sum values
/// Row 1   1         3*        4
/// Row 2   25%       75%       4
/// Average values  ...
/// ```
pub fn table(snapshot: &Snapshot) -> String {
    let columns = snapshot.column_count();
    let mut lines: Vec<Vec<String>> = Vec::with_capacity(snapshot.rows.len() + 2);

    let mut header = vec![String::new()];
    header.extend((1..=columns).map(|c| format!("Column {}", c)));
    header.push("Sum values".to_string());
    lines.push(header);

    for row in &snapshot.rows {
        let mut line = vec![format!("Row {}", row.index + 1)];
        line.extend(row.cells.iter().map(cell_text));
        line.push(row.sum.to_string());
        lines.push(line);
    }

    let mut footer = vec!["Average values".to_string()];
    footer.extend(snapshot.column_averages.iter().map(|a| format_average(*a)));
    footer.push(String::new());
    lines.push(footer);

    align(&lines)
}

/// Proximity ranking with the selected prefix marked.
pub fn ranking(outcome: &SearchOutcome, requested: usize) -> String {
    let mut lines = vec![vec![
        "#".to_string(),
        "Row".to_string(),
        "Column".to_string(),
        "Amount".to_string(),
        "Distance".to_string(),
        String::new(),
    ]];

    for (i, r) in outcome.ranked.iter().enumerate() {
        let mark = if i < outcome.selected { HIGHLIGHT_MARK } else { "" };
        lines.push(vec![
            (i + 1).to_string(),
            (r.row + 1).to_string(),
            (r.col + 1).to_string(),
            r.amount.to_string(),
            r.distance.to_string(),
            mark.to_string(),
        ]);
    }

    let mut out = align(&lines);
    out.push_str(&format!(
        "selected {} of {} (requested {}, extra {})\n",
        outcome.selected,
        outcome.ranked.len(),
        requested,
        outcome.extra
    ));
    out
}

/// Column average; `-` when the grid has no rows.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => avg.to_string(),
        None => "-".to_string(),
    }
}

fn cell_text(cell: &CellView) -> String {
    let mut text = match cell.percent {
        Some(percent) => percent.to_string(),
        None => cell.amount.to_string(),
    };
    if cell.highlighted {
        text.push_str(HIGHLIGHT_MARK);
    }
    text
}

/// Pad every column to its widest entry, two spaces between columns.
fn align(lines: &[Vec<String>]) -> String {
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; width];
    for line in lines {
        for (i, text) in line.iter().enumerate() {
            widths[i] = widths[i].max(UnicodeWidthStr::width(text.as_str()));
        }
    }

    let mut out = String::new();
    for line in lines {
        let mut rendered = String::new();
        for (i, text) in line.iter().enumerate() {
            if i > 0 {
                rendered.push_str("  ");
            }
            rendered.push_str(&pad_right(text, widths[i]));
        }
        out.push_str(rendered.trim_end());
        out.push('\n');
    }
    out
}

fn pad_right(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(sw)))
}
