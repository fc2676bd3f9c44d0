//! Protocol command dispatch.
//!
//! Maps one `Request` to the matching session operation and wraps the outcome
//! in a `Response`. This is the whole contract a presentation layer needs.

use tallygrid_protocol::{Command, ErrorMessage, OkMessage, Request, Response, Snapshot};

use crate::session::{Session, SessionError};
use crate::view;

impl Session {
    /// Run one command. `Snapshot` is the only command that returns state.
    pub fn execute(&mut self, command: &Command) -> Result<Option<Snapshot>, SessionError> {
        match *command {
            Command::Generate { rows, columns } => self.generate(rows, columns),
            Command::Increment { row, col } => self.increment(row, col)?,
            Command::Press { row, col } => self.press(row, col)?,
            Command::Hover { row, col } => self.hover(row, col)?,
            Command::Search { target, count } => self.search(target, count)?,
            Command::ClearHighlight => self.clear_highlight(),
            Command::AddRow => self.add_row()?,
            Command::RemoveRow { row } => self.remove_row(row)?,
            Command::SetPercentFocus { row } => self.set_percent_focus(row)?,
            Command::SetHighlightCount { count } => self.set_highlight_count(count),
            Command::Snapshot => return Ok(Some(view::snapshot(self))),
        }
        Ok(None)
    }

    /// Run one request and build its response.
    pub fn apply(&mut self, request: Request) -> Response {
        let Request { id, command } = request;
        let before = self.revision();

        match self.execute(&command) {
            Ok(snapshot) => {
                log::debug!("applied {:?} -> revision {}", command, self.revision());
                Response::Ok(OkMessage {
                    id,
                    revision: self.revision(),
                    events: self.events().since(before).cloned().collect(),
                    snapshot,
                })
            }
            Err(e) => {
                log::warn!("rejected {:?}: {}", command, e);
                Response::Error(ErrorMessage {
                    id,
                    code: e.code().to_string(),
                    message: e.to_string(),
                    revision: self.revision(),
                })
            }
        }
    }
}

/// Response for a line that did not parse as a request.
pub fn parse_error(revision: u64, message: impl Into<String>) -> Response {
    Response::Error(ErrorMessage {
        id: None,
        code: "parse_error".to_string(),
        message: message.into(),
        revision,
    })
}
