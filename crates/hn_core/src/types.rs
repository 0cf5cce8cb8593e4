use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;
use uuid::Uuid;

use crate::{Error, Result};

pub const DEFAULT_SOURCE: &str = "Custom upload";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub content: String,
}

/// A TL;DR plus at most three takeaways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub tldr: String,
    pub takeaways: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rewrite {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleStatus {
    pub is_summarizing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<String>,
    pub is_rewriting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite_error: Option<String>,
}

/// Serializable state blob handed to persistence backends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub summaries: HashMap<String, Summary>,
    #[serde(default)]
    pub rewrites: HashMap<String, Rewrite>,
    #[serde(default)]
    pub statuses: HashMap<String, ArticleStatus>,
}

/// A manually pasted article, before it gets an id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub auto_summarize: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ArticleDraft {
    pub fn into_article(self) -> Result<Article> {
        if self.title.trim().is_empty() || self.url.trim().is_empty() || self.content.trim().is_empty() {
            return Err(Error::InvalidArticle(
                "Title, URL, and full article text are required.".to_string(),
            ));
        }
        let url = Url::parse(self.url.trim())
            .map_err(|e| Error::InvalidArticle(format!("{}: {}", self.url.trim(), e)))?;

        let content = match non_blank(self.description) {
            Some(description) => format!("{}\n\n{}", description, self.content),
            None => self.content,
        };

        Ok(Article {
            id: Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            source: non_blank(self.source).unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            published_at: self.published_at.unwrap_or_else(Utc::now),
            author: non_blank(self.author),
            url: url.to_string(),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ArticleDraft {
        ArticleDraft {
            title: "Sleep and memory".to_string(),
            url: "https://example.com/sleep".to_string(),
            content: "Deep sleep consolidates memory.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_draft_defaults() {
        let article = draft().into_article().unwrap();
        assert_eq!(article.source, DEFAULT_SOURCE);
        assert_eq!(article.author, None);
        assert_eq!(article.content, "Deep sleep consolidates memory.");
        assert!(Uuid::parse_str(&article.id).is_ok());
    }

    #[test]
    fn test_draft_description_is_prepended() {
        let mut d = draft();
        d.description = Some("A short intro.".to_string());
        d.author = Some("  ".to_string());
        let article = d.into_article().unwrap();
        assert_eq!(article.content, "A short intro.\n\nDeep sleep consolidates memory.");
        assert_eq!(article.author, None);
    }

    #[test]
    fn test_draft_requires_fields() {
        let mut d = draft();
        d.content = "   ".to_string();
        let err = d.into_article().unwrap_err();
        assert!(matches!(err, Error::InvalidArticle(_)));

        let mut d = draft();
        d.url = "not a url".to_string();
        assert!(matches!(d.into_article(), Err(Error::InvalidArticle(_))));
    }

    #[test]
    fn test_draft_with_missing_fields_fails_validation() {
        let d: ArticleDraft =
            serde_json::from_str(r#"{"url": "https://example.com/x", "content": "x"}"#).unwrap();
        assert_eq!(d.title, "");
        assert!(!d.auto_summarize);
        assert!(matches!(d.into_article(), Err(Error::InvalidArticle(_))));

        let d: ArticleDraft = serde_json::from_str("{}").unwrap();
        assert!(matches!(d.into_article(), Err(Error::InvalidArticle(_))));
    }

    #[test]
    fn test_article_serializes_camel_case() {
        let article = draft().into_article().unwrap();
        let value = serde_json::to_value(&article).unwrap();
        assert!(value.get("publishedAt").is_some());
        assert!(value.get("author").is_none());
    }
}
