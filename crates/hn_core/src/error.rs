use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Generation error {status}: {message}")]
    Generation { status: u16, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Generation request was cancelled")]
    Cancelled,

    #[error("Invalid article: {0}")]
    InvalidArticle(String),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True for the failures a generation client can produce. These are the
    /// ones absorbed into fallback output rather than surfaced.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            Error::Network(_)
                | Error::Generation { .. }
                | Error::Protocol(_)
                | Error::Cancelled
                | Error::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
