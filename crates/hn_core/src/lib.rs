pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::GenerationClient;
pub use storage::StatePersistence;
pub use types::{Article, ArticleDraft, ArticleStatus, Rewrite, StoreSnapshot, Summary};
