use std::time::Duration;

pub mod curator;
pub mod interpreter;
pub mod models;
pub mod prompts;
pub mod summarizer;

pub const DEFAULT_MODEL_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL_NAME: &str = "llama3.2";
pub const DEFAULT_BACKEND: &str = "ollama";

/// Where and how to reach the text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    pub model_url: String,
    pub model_name: String,
    /// `ollama` or `offline`.
    pub backend: String,
    /// `None` leaves the request unbounded.
    pub timeout: Option<Duration>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_url: DEFAULT_MODEL_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            backend: DEFAULT_BACKEND.to_string(),
            timeout: None,
        }
    }
}

impl InferenceConfig {
    /// Apply `HN_MODEL_URL`, `HN_MODEL` and `HN_MODEL_BACKEND` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("HN_MODEL_URL") {
            if !url.trim().is_empty() {
                self.model_url = url.trim().to_string();
            }
        }
        if let Ok(model) = std::env::var("HN_MODEL") {
            if !model.trim().is_empty() {
                self.model_name = model.trim().to_string();
            }
        }
        if let Ok(backend) = std::env::var("HN_MODEL_BACKEND") {
            if !backend.trim().is_empty() {
                self.backend = backend.trim().to_lowercase();
            }
        }
        self
    }
}

pub mod prelude {
    pub use super::curator::Curator;
    pub use super::models::create_client;
    pub use super::summarizer::{Generated, Summarizer};
    pub use super::InferenceConfig;
    pub use hn_core::{Article, ArticleDraft, Error, Result, Rewrite, Summary};
}

pub use models::create_client;
