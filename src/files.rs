pub mod catalog;
pub mod eraser;

pub use catalog::list_files;
pub use eraser::{delete_files, DeleteOutcome, DeleteReport, FailedDeletion};
