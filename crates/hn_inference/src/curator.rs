use futures::future::join_all;
use hn_core::{
    Article, ArticleDraft, ArticleStatus, Error, Result, Rewrite, StatePersistence, StoreSnapshot, Summary,
};
use hn_storage::{sample_articles, ArticleStore, FeedPage, DEFAULT_PAGE_SIZE};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::summarizer::Summarizer;

pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(600);

/// Everything known about one article.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetail {
    pub article: Article,
    pub summary: Option<Summary>,
    pub rewrite: Option<Rewrite>,
    pub status: ArticleStatus,
}

/// Drives an [`ArticleStore`] with a [`Summarizer`] and saves a snapshot
/// after every completed change.
pub struct Curator {
    store: Arc<RwLock<ArticleStore>>,
    summarizer: Summarizer,
    persistence: Arc<dyn StatePersistence>,
    save_lock: Mutex<()>,
    load_delay: Duration,
}

impl Curator {
    pub fn new(summarizer: Summarizer, persistence: Arc<dyn StatePersistence>) -> Self {
        Self::with_store(ArticleStore::new(), summarizer, persistence)
    }

    pub fn with_store(store: ArticleStore, summarizer: Summarizer, persistence: Arc<dyn StatePersistence>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            summarizer,
            persistence,
            save_lock: Mutex::new(()),
            load_delay: DEFAULT_LOAD_DELAY,
        }
    }

    /// Start from the last saved snapshot. An unreadable snapshot is logged
    /// and replaced with an empty store.
    pub async fn restore(summarizer: Summarizer, persistence: Arc<dyn StatePersistence>) -> Self {
        let store = match persistence.load().await {
            Ok(Some(snapshot)) => {
                info!(
                    "💾 Restored {} articles from {} storage",
                    snapshot.articles.len(),
                    persistence.name()
                );
                ArticleStore::from_snapshot(snapshot)
            }
            Ok(None) => ArticleStore::new(),
            Err(e) => {
                warn!("Failed to load saved state, starting empty: {}", e);
                ArticleStore::new()
            }
        };
        Self::with_store(store, summarizer, persistence)
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn store(&self) -> Arc<RwLock<ArticleStore>> {
        self.store.clone()
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    async fn persist(&self) {
        let _guard = self.save_lock.lock().await;
        let snapshot = self.store.read().await.snapshot();
        if let Err(e) = self.persistence.save(&snapshot).await {
            warn!("Failed to save state to {} storage: {}", self.persistence.name(), e);
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.store.read().await.snapshot()
    }

    pub async fn articles(&self) -> Vec<Article> {
        self.store.read().await.articles().to_vec()
    }

    pub async fn article(&self, id: &str) -> Result<ArticleDetail> {
        let store = self.store.read().await;
        let article = store
            .article(id)
            .cloned()
            .ok_or_else(|| Error::ArticleNotFound(id.to_string()))?;
        Ok(ArticleDetail {
            article,
            summary: store.summary(id).cloned(),
            rewrite: store.rewrite(id).cloned(),
            status: store.status(id).cloned().unwrap_or_default(),
        })
    }

    pub async fn feed(&self, page: usize) -> FeedPage {
        self.store.read().await.feed(page, DEFAULT_PAGE_SIZE)
    }

    /// Validate and insert a pasted article, summarizing it right away when
    /// the draft asks for it.
    pub async fn add_article(&self, draft: ArticleDraft) -> Result<Article> {
        let auto_summarize = draft.auto_summarize;
        let article = draft.into_article()?;
        info!("📥 Added article {} ({})", article.id, article.title);

        self.store.write().await.add_article(article.clone());
        self.persist().await;

        if auto_summarize {
            self.summarize_one(&article.id).await?;
        }
        Ok(article)
    }

    /// Replace the article list with whatever `loader` produces.
    pub async fn load_articles<F>(&self, loader: F) -> Result<usize>
    where
        F: Future<Output = Result<Vec<Article>>>,
    {
        self.store.write().await.begin_loading();
        match loader.await {
            Ok(articles) => {
                let count = articles.len();
                self.store.write().await.finish_loading(articles);
                self.persist().await;
                info!("📚 Loaded {} articles", count);
                Ok(count)
            }
            Err(e) => {
                self.store.write().await.fail_loading(e.to_string());
                warn!("Failed to load articles: {}", e);
                Err(e)
            }
        }
    }

    pub async fn load_samples(&self) -> Result<usize> {
        let delay = self.load_delay;
        self.load_articles(async move {
            tokio::time::sleep(delay).await;
            Ok::<_, Error>(sample_articles())
        })
        .await
    }

    async fn content_of(&self, id: &str) -> Result<String> {
        self.store
            .read()
            .await
            .article(id)
            .map(|a| a.content.clone())
            .ok_or_else(|| Error::ArticleNotFound(id.to_string()))
    }

    pub async fn summarize_one(&self, id: &str) -> Result<Summary> {
        let content = self.content_of(id).await?;
        self.store.write().await.begin_summarize(id);

        let generated = self.summarizer.summarize_with(&content, None).await;
        let summary = generated.value.clone();
        self.store
            .write()
            .await
            .complete_summarize(id, generated.value, generated.fallback_reason);
        self.persist().await;
        Ok(summary)
    }

    pub async fn rewrite_one(&self, id: &str) -> Result<Rewrite> {
        let content = self.content_of(id).await?;
        self.store.write().await.begin_rewrite(id);

        let generated = self.summarizer.rewrite_with(&content, None).await;
        let rewrite = generated.value.clone();
        self.store
            .write()
            .await
            .complete_rewrite(id, generated.value, generated.fallback_reason);
        self.persist().await;
        Ok(rewrite)
    }

    /// Summarize every article concurrently.
    pub async fn summarize_all(&self) -> Vec<(String, Summary)> {
        let ids: Vec<String> = self
            .store
            .read()
            .await
            .articles()
            .iter()
            .map(|a| a.id.clone())
            .collect();
        info!("🧠 Summarizing {} articles with {}", ids.len(), self.summarizer.client_name());

        let results = join_all(ids.iter().map(|id| self.summarize_one(id))).await;
        ids.into_iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(summary) => Some((id, summary)),
                Err(e) => {
                    warn!("Skipped article {}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    pub async fn refresh_summaries(&self) -> Vec<(String, Summary)> {
        self.summarize_all().await
    }
}
