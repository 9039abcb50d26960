use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::LibrarySnapshot;
use crate::ports::snapshot_store::{Result, SnapshotStore};

/// スナップショットをJSONファイルに保存するアダプタ
///
/// 保存先のディレクトリは必要に応じて作成する。ファイルが無い状態は
/// 「まだ何も保存されていない」として扱い、エラーにしない。
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn save(&self, snapshot: &LibrarySnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::info!(path = %self.path.display(), "library snapshot saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<LibrarySnapshot>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot = serde_json::from_slice(&raw)?;
        Ok(Some(snapshot))
    }
}
