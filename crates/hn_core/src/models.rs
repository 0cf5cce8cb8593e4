use async_trait::async_trait;
use futures::future::AbortRegistration;
use std::fmt;
use crate::Result;

#[async_trait]
pub trait GenerationClient: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Send one prompt to the text-generation service and return the generated text.
    ///
    /// When `abort` is given, triggering its `AbortHandle` aborts this request
    /// only and yields `Error::Cancelled`.
    async fn generate(&self, prompt: &str, abort: Option<AbortRegistration>) -> Result<String>;
}
