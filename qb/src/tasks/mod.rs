//! Task board: cache, optimistic moves and the drop surface

mod dnd;
mod error;
mod store;

pub use dnd::{DropTarget, parse_column};
pub use error::TaskError;
pub use store::{ConfirmDelete, TaskStore};
