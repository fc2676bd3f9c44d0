//! JSONL command scripts.
//!
//! One request per line. Blank lines and lines starting with `//` are skipped.
//! Every other line produces exactly one response line.

use std::io::{self, BufRead, Write};

use tallygrid_core::dispatch::parse_error;
use tallygrid_core::Session;
use tallygrid_protocol::{Request, Response};

/// Counts from one pass over a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub applied: usize,
    pub failed: usize,
    /// `fail_fast` was set and a line failed.
    pub stopped: bool,
}

/// Parse one script line. `None` for lines that carry no request.
pub fn parse_line(line: &str) -> Option<Result<Request, String>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") {
        return None;
    }
    Some(serde_json::from_str(trimmed).map_err(|e| e.to_string()))
}

/// Apply every request in `input` to `session`, writing one JSON response
/// per request line to `out`.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    fail_fast: bool,
) -> io::Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();

    for (lineno, line) in input.lines().enumerate() {
        let line = line?;
        let response = match parse_line(&line) {
            None => continue,
            Some(Ok(request)) => session.apply(request),
            Some(Err(message)) => {
                log::warn!("line {}: {}", lineno + 1, message);
                parse_error(session.revision(), format!("line {}: {}", lineno + 1, message))
            }
        };

        let ok = response.is_ok();
        write_response(out, &response)?;

        if ok {
            summary.applied += 1;
        } else {
            summary.failed += 1;
            if fail_fast {
                summary.stopped = true;
                break;
            }
        }
    }

    out.flush()?;
    Ok(summary)
}

fn write_response<W: Write>(out: &mut W, response: &Response) -> io::Result<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)
}
