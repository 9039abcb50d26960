use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::LibrarySnapshot;
use crate::ports::snapshot_store::{Result, SnapshotStore as SnapshotStoreTrait};

/// SnapshotStoreのモック実装
///
/// メモリ上に最後のスナップショットを1つだけ保持する。
pub struct SnapshotStore {
    slot: Mutex<Option<LibrarySnapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// テスト用に保存済み状態を仕込む
    pub fn preload(&self, snapshot: LibrarySnapshot) {
        *self.slot.lock().unwrap() = Some(snapshot);
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStoreTrait for SnapshotStore {
    async fn save(&self, snapshot: &LibrarySnapshot) -> Result<()> {
        *self.slot.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<LibrarySnapshot>> {
        Ok(self.slot.lock().unwrap().clone())
    }
}
