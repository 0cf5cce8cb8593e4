use async_trait::async_trait;
use hn_core::{Error, Result, StatePersistence, StoreSnapshot};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores the snapshot as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatePersistence for FilePersistence {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<Option<StoreSnapshot>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let snapshot = serde_json::from_str(&raw).map_err(|e| {
            Error::Storage(format!("Corrupt state file {}: {}", self.path.display(), e))
        })?;
        debug!("Loaded state from {}", self.path.display());
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(snapshot)?;
        // Write then rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}
