use async_trait::async_trait;
use hn_core::{Result, StatePersistence, StoreSnapshot};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps the last snapshot in process memory. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    snapshot: Arc<RwLock<Option<StoreSnapshot>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatePersistence for MemoryPersistence {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<Option<StoreSnapshot>> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::sample_articles;

    #[tokio::test]
    async fn test_memory_persistence() {
        let persistence = MemoryPersistence::new();
        assert!(persistence.load().await.unwrap().is_none());

        let snapshot = StoreSnapshot {
            articles: sample_articles(),
            ..Default::default()
        };
        persistence.save(&snapshot).await.unwrap();

        let loaded = persistence.load().await.unwrap().unwrap();
        assert_eq!(loaded.articles.len(), 3);
        assert_eq!(loaded, snapshot);
    }
}
