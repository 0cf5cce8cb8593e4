use async_trait::async_trait;
use crate::types::StoreSnapshot;
use crate::Result;

/// Where the curator's state blob lives between runs.
#[async_trait]
pub trait StatePersistence: Send + Sync {
    fn name(&self) -> &str;

    /// Load the last saved snapshot, `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<StoreSnapshot>>;

    /// Replace the saved snapshot.
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}
