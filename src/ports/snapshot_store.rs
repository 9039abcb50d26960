use async_trait::async_trait;

use crate::domain::LibrarySnapshot;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Snapshot persistence port.
///
/// The core defines the snapshot shape; this port only abstracts where the
/// document lives. Implementations must hand the snapshot back unchanged.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist the snapshot, replacing any previously persisted one.
    async fn save(&self, snapshot: &LibrarySnapshot) -> Result<()>;

    /// Load the last persisted snapshot.
    ///
    /// Returns `None` when nothing has been persisted yet; that is not an
    /// error, the service starts from an empty (or seeded) state instead.
    async fn load(&self) -> Result<Option<LibrarySnapshot>>;
}
