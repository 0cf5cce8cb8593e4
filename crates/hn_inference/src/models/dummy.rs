use futures::future::AbortRegistration;
use hn_core::{Error, GenerationClient, Result};

/// Client that never touches the network: it either replays one canned
/// response or fails every call.
#[derive(Debug, Clone)]
pub struct DummyClient {
    response: Option<String>,
}

impl DummyClient {
    pub fn responding(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
        }
    }

    pub fn offline() -> Self {
        Self { response: None }
    }
}

#[async_trait::async_trait]
impl GenerationClient for DummyClient {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, _prompt: &str, _abort: Option<AbortRegistration>) -> Result<String> {
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(Error::Network("offline mode, no generation service".to_string())),
        }
    }
}
