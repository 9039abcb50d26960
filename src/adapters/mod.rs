pub mod json_file;
pub mod mock;

pub use json_file::JsonFileSnapshotStore;
