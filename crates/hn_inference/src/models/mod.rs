use hn_core::{Error, GenerationClient, Result};
use std::sync::Arc;
use tracing::info;

use crate::InferenceConfig;

pub mod dummy;
pub mod ollama;

pub use dummy::DummyClient;
pub use ollama::OllamaClient;

/// Build the generation client named by `config.backend`.
pub fn create_client(config: &InferenceConfig) -> Result<Arc<dyn GenerationClient>> {
    let client: Arc<dyn GenerationClient> = match config.backend.as_str() {
        "ollama" => Arc::new(OllamaClient::new(config)?),
        "offline" | "dummy" => Arc::new(DummyClient::offline()),
        other => {
            return Err(Error::Config(format!(
                "Unknown model backend: {}. Available backends: ollama, offline",
                other
            )))
        }
    };
    info!("🧠 Generation client ready (using {})", client.name());
    Ok(client)
}
