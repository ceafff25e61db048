use crate::ports::storage::{StoragePort, Visibility};
use async_trait::async_trait;
use std::error::Error;
use std::path::{Component, Path, PathBuf};

/// Stores objects as plain files under `root`, one file per key.
#[derive(Debug, Clone)]
pub struct FsAdapter {
    root: PathBuf,
}

impl FsAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `key` under the root, refusing anything that would escape it.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let key_path = Path::new(key);
        if key.is_empty() {
            return None;
        }
        for component in key_path.components() {
            if !matches!(component, Component::Normal(_)) {
                return None;
            }
        }
        Some(self.root.join(key_path))
    }
}

#[async_trait]
impl StoragePort for FsAdapter {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
        _visibility: Visibility,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        // Content type and visibility have no meaning on a plain filesystem.
        let path = self
            .path_for(key)
            .ok_or_else(|| format!("Invalid key {:?}", key))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }
}
