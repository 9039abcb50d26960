pub mod book;
pub mod catalog;
pub mod commands;
pub mod errors;
pub mod graph;
pub mod queue;
pub mod snapshot;
pub mod user;
pub mod value_objects;

pub use book::Book;
pub use catalog::{BookFilter, BookUpdate, Catalog};
pub use commands::BorrowRequest;
pub use errors::CopyError;
pub use graph::InteractionGraph;
pub use queue::{EmptyQueue, FifoQueue};
pub use snapshot::{LibrarySnapshot, SNAPSHOT_VERSION};
pub use user::User;
pub use value_objects::*;
