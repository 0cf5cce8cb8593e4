use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hn_core::{Article, ArticleDraft, Error, Rewrite, StoreSnapshot, Summary};
use hn_inference::curator::ArticleDetail;
use hn_storage::FeedPage;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::AppState;

pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::ArticleNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidArticle(_) => StatusCode::BAD_REQUEST,
            other => {
                error!("Request failed: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub loaded: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryEntry {
    pub id: String,
    pub summary: Summary,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<usize>,
}

pub async fn list_articles(State(state): State<Arc<AppState>>) -> Json<Vec<Article>> {
    Json(state.curator.articles().await)
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ArticleDraft>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let article = state.curator.add_article(draft).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<ArticleDetail> {
    Ok(Json(state.curator.article(&id).await?))
}

pub async fn summarize_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Summary> {
    Ok(Json(state.curator.summarize_one(&id).await?))
}

pub async fn rewrite_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Rewrite> {
    Ok(Json(state.curator.rewrite_one(&id).await?))
}

pub async fn load_samples(State(state): State<Arc<AppState>>) -> ApiResult<LoadResponse> {
    let loaded = state.curator.load_samples().await?;
    Ok(Json(LoadResponse { loaded }))
}

pub async fn refresh_summaries(State(state): State<Arc<AppState>>) -> Json<Vec<SummaryEntry>> {
    let entries = state
        .curator
        .refresh_summaries()
        .await
        .into_iter()
        .map(|(id, summary)| SummaryEntry { id, summary })
        .collect();
    Json(entries)
}

pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Json<FeedPage> {
    Json(state.curator.feed(query.page.unwrap_or(1)).await)
}

pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StoreSnapshot> {
    Json(state.curator.snapshot().await)
}
