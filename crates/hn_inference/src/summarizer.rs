use futures::future::{join_all, AbortRegistration};
use hn_core::{Article, Error, GenerationClient, Rewrite, Summary};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::interpreter::{fallback_rewrite, fallback_summary, parse_rewrite, parse_summary};
use crate::prompts::{rewrite_prompt, summary_prompt};

/// A failed generation call, to be replaced by offline output.
#[derive(Debug)]
pub struct Fallback {
    pub cause: Error,
}

impl From<Error> for Fallback {
    fn from(cause: Error) -> Self {
        Self { cause }
    }
}

impl Fallback {
    fn reason(&self, operation: &str) -> String {
        if self.cause.is_generation_failure() {
            warn!("{} fell back to offline output: {}", operation, self.cause);
        } else {
            error!("{} fell back after an unexpected client error: {}", operation, self.cause);
        }
        self.cause.to_string()
    }
}

/// Output plus the reason it came from the fallback path, if it did.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub value: T,
    pub fallback_reason: Option<String>,
}

impl<T> Generated<T> {
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Summarizes and rewrites article text. Never fails: any client error is
/// logged and replaced by the heuristic output for the same content.
pub struct Summarizer {
    client: Arc<dyn GenerationClient>,
}

impl fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summarizer")
            .field("client", &self.client.name())
            .finish()
    }
}

impl Summarizer {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    pub async fn summarize(&self, content: &str) -> Summary {
        self.summarize_with(content, None).await.value
    }

    pub async fn rewrite(&self, content: &str) -> Rewrite {
        self.rewrite_with(content, None).await.value
    }

    pub async fn summarize_with(&self, content: &str, abort: Option<AbortRegistration>) -> Generated<Summary> {
        match self.try_summarize(content, abort).await {
            Ok(value) => Generated { value, fallback_reason: None },
            Err(fallback) => Generated {
                value: fallback_summary(content),
                fallback_reason: Some(fallback.reason("Summarize")),
            },
        }
    }

    pub async fn rewrite_with(&self, content: &str, abort: Option<AbortRegistration>) -> Generated<Rewrite> {
        match self.try_rewrite(content, abort).await {
            Ok(value) => Generated { value, fallback_reason: None },
            Err(fallback) => Generated {
                value: fallback_rewrite(content),
                fallback_reason: Some(fallback.reason("Rewrite")),
            },
        }
    }

    /// Summarize every article concurrently. Results keep input order and
    /// are paired with the article id.
    pub async fn summarize_articles(&self, articles: &[Article]) -> Vec<(String, Summary)> {
        let tasks = articles.iter().map(|article| async move {
            (article.id.clone(), self.summarize(&article.content).await)
        });
        join_all(tasks).await
    }

    async fn try_summarize(&self, content: &str, abort: Option<AbortRegistration>) -> Result<Summary, Fallback> {
        let raw = self.client.generate(&summary_prompt(content), abort).await?;
        debug!("Raw summary response: {}", raw);
        Ok(parse_summary(&raw))
    }

    async fn try_rewrite(&self, content: &str, abort: Option<AbortRegistration>) -> Result<Rewrite, Fallback> {
        let raw = self.client.generate(&rewrite_prompt(content), abort).await?;
        debug!("Raw rewrite response: {}", raw);
        Ok(parse_rewrite(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DummyClient;
    use futures::future::{AbortHandle, Abortable};
    use std::time::Duration;

    const CONTENT: &str = "A. B. C. D. E.";

    #[tokio::test]
    async fn test_summarize_parses_generated_text() {
        let client = Arc::new(DummyClient::responding("TLDR: X\nTAKEAWAYS:\n- A\n- B"));
        let summarizer = Summarizer::new(client);

        let generated = summarizer.summarize_with(CONTENT, None).await;
        assert!(!generated.is_fallback());
        assert_eq!(generated.value.tldr, "X");
        assert_eq!(generated.value.takeaways, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_summarize_falls_back_on_client_failure() {
        let summarizer = Summarizer::new(Arc::new(DummyClient::offline()));

        let generated = summarizer.summarize_with(CONTENT, None).await;
        assert!(generated.is_fallback());
        assert!(generated.fallback_reason.unwrap().starts_with("Network error"));

        let expected = fallback_summary(CONTENT);
        assert_eq!(generated.value.tldr, expected.tldr);
        assert_eq!(generated.value.takeaways, expected.takeaways);
    }

    #[tokio::test]
    async fn test_malformed_success_is_not_a_fallback() {
        let summarizer = Summarizer::new(Arc::new(DummyClient::responding("just some prose")));
        let generated = summarizer.summarize_with(CONTENT, None).await;
        assert!(!generated.is_fallback());
        assert_eq!(generated.value.tldr, "just some prose");
        assert!(generated.value.takeaways.is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_paths() {
        let summarizer = Summarizer::new(Arc::new(DummyClient::responding("REWRITE:\nFriendly text.")));
        assert_eq!(summarizer.rewrite("0123456789").await.text, "Friendly text.");

        let summarizer = Summarizer::new(Arc::new(DummyClient::offline()));
        let generated = summarizer.rewrite_with("0123456789", None).await;
        assert!(generated.is_fallback());
        assert_eq!(generated.value.text, "01234567");
    }

    #[derive(Debug)]
    struct MisconfiguredClient;

    #[async_trait::async_trait]
    impl GenerationClient for MisconfiguredClient {
        fn name(&self) -> &str {
            "Misconfigured"
        }

        async fn generate(&self, _prompt: &str, _abort: Option<AbortRegistration>) -> hn_core::Result<String> {
            Err(Error::Config("no endpoint".to_string()))
        }
    }

    #[tokio::test]
    async fn test_unexpected_client_error_is_still_absorbed() {
        let summarizer = Summarizer::new(Arc::new(MisconfiguredClient));

        let generated = summarizer.summarize_with(CONTENT, None).await;
        assert_eq!(
            generated.fallback_reason.as_deref(),
            Some("Configuration error: no endpoint")
        );
        assert_eq!(generated.value.tldr, "A. B...");

        let generated = summarizer.rewrite_with("0123456789", None).await;
        assert!(generated.is_fallback());
        assert_eq!(generated.value.text, "01234567");
    }

    #[derive(Debug)]
    struct SlowClient;

    #[async_trait::async_trait]
    impl GenerationClient for SlowClient {
        fn name(&self) -> &str {
            "Slow"
        }

        async fn generate(&self, _prompt: &str, abort: Option<AbortRegistration>) -> hn_core::Result<String> {
            let sleep = tokio::time::sleep(Duration::from_secs(10));
            match abort {
                Some(registration) => Abortable::new(sleep, registration)
                    .await
                    .map_err(|_| Error::Cancelled)?,
                None => sleep.await,
            }
            Ok("TLDR: late".to_string())
        }
    }

    #[tokio::test]
    async fn test_cancelled_request_is_absorbed() {
        let (handle, registration) = AbortHandle::new_pair();
        handle.abort();

        let summarizer = Summarizer::new(Arc::new(SlowClient));
        let generated = summarizer.summarize_with(CONTENT, Some(registration)).await;
        assert_eq!(
            generated.fallback_reason.as_deref(),
            Some("Generation request was cancelled")
        );
        assert_eq!(generated.value.takeaways, vec!["C", "D", "E"]);
    }
}
