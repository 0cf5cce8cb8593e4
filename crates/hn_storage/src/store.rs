use hn_core::{Article, ArticleStatus, Rewrite, StoreSnapshot, Summary};
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of articles that already have a summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub page: usize,
    pub total_pages: usize,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub article: Article,
    pub summary: Summary,
}

/// Articles plus the generated output and per-article status, keyed by id.
///
/// Owned by whoever drives it; persistence is the caller's job via
/// [`ArticleStore::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct ArticleStore {
    articles: Vec<Article>,
    summaries: HashMap<String, Summary>,
    rewrites: HashMap<String, Rewrite>,
    statuses: HashMap<String, ArticleStatus>,
    is_loading: bool,
    load_error: Option<String>,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            articles: snapshot.articles,
            summaries: snapshot.summaries,
            rewrites: snapshot.rewrites,
            statuses: snapshot.statuses,
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            articles: self.articles.clone(),
            summaries: self.summaries.clone(),
            rewrites: self.rewrites.clone(),
            statuses: self.statuses.clone(),
        }
    }

    /// Newest first. An article with the same id is replaced.
    pub fn add_article(&mut self, article: Article) {
        self.articles.retain(|a| a.id != article.id);
        self.statuses.insert(article.id.clone(), ArticleStatus::default());
        self.articles.insert(0, article);
    }

    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.load_error = None;
    }

    pub fn finish_loading(&mut self, articles: Vec<Article>) {
        for article in &articles {
            self.statuses.entry(article.id.clone()).or_default();
        }
        self.articles = articles;
        self.is_loading = false;
        self.load_error = None;
    }

    pub fn fail_loading(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.load_error = Some(message.into());
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn summary(&self, id: &str) -> Option<&Summary> {
        self.summaries.get(id)
    }

    pub fn rewrite(&self, id: &str) -> Option<&Rewrite> {
        self.rewrites.get(id)
    }

    pub fn status(&self, id: &str) -> Option<&ArticleStatus> {
        self.statuses.get(id)
    }

    pub fn begin_summarize(&mut self, id: &str) {
        let status = self.statuses.entry(id.to_string()).or_default();
        status.is_summarizing = true;
        status.summary_error = None;
    }

    /// `fallback_reason` is set when the summary came from the offline heuristic.
    pub fn complete_summarize(&mut self, id: &str, summary: Summary, fallback_reason: Option<String>) {
        self.summaries.insert(id.to_string(), summary);
        let status = self.statuses.entry(id.to_string()).or_default();
        status.is_summarizing = false;
        status.summary_error = fallback_reason;
    }

    pub fn begin_rewrite(&mut self, id: &str) {
        let status = self.statuses.entry(id.to_string()).or_default();
        status.is_rewriting = true;
        status.rewrite_error = None;
    }

    pub fn complete_rewrite(&mut self, id: &str, rewrite: Rewrite, fallback_reason: Option<String>) {
        self.rewrites.insert(id.to_string(), rewrite);
        let status = self.statuses.entry(id.to_string()).or_default();
        status.is_rewriting = false;
        status.rewrite_error = fallback_reason;
    }

    /// 1-based paging over summarized articles in article order. Out-of-range
    /// pages are clamped.
    pub fn feed(&self, page: usize, page_size: usize) -> FeedPage {
        let page_size = page_size.max(1);
        let summarized: Vec<FeedItem> = self
            .articles
            .iter()
            .filter_map(|article| {
                self.summaries.get(&article.id).map(|summary| FeedItem {
                    article: article.clone(),
                    summary: summary.clone(),
                })
            })
            .collect();

        let total_pages = summarized.len().div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);
        let items = summarized
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        FeedPage { page, total_pages, items }
    }
}
