pub mod dispatch;
pub mod highlight;
pub mod limits;
pub mod session;
pub mod view;

pub use highlight::HighlightSet;
pub use limits::Limits;
pub use session::{Session, SessionError, SessionOptions};
