use hn_core::{Error, Result, StatePersistence};
use std::path::PathBuf;
use std::sync::Arc;

pub mod backends;
pub mod samples;
pub mod store;

pub use backends::*;
pub use samples::sample_articles;
pub use store::{ArticleStore, FeedPage, DEFAULT_PAGE_SIZE};

pub const DEFAULT_STATE_FILE: &str = ".hn-state.json";

/// Build a persistence backend by name (`memory` or `file`).
pub fn create_persistence(kind: &str, location: Option<&str>) -> Result<Arc<dyn StatePersistence>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryPersistence::new())),
        "file" => {
            let path = PathBuf::from(location.unwrap_or(DEFAULT_STATE_FILE));
            Ok(Arc::new(FilePersistence::new(path)))
        }
        other => Err(Error::Storage(format!(
            "Unknown storage backend: {}. Available backends: memory, file",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_persistence, sample_articles, ArticleStore, FeedPage};
}
