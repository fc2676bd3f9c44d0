pub mod aggregate;
pub mod cell;
pub mod cell_id;
pub mod error;
pub mod events;
pub mod grid;
pub mod search;

pub use cell::{Amount, Cell};
pub use cell_id::{CellId, IdGenerator, RandomIds, SequentialIds};
pub use error::{Axis, GridError};
pub use grid::Grid;
pub use search::ShortGridPolicy;
