use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/articles", get(handlers::list_articles).post(handlers::create_article))
        .route("/api/articles/:id", get(handlers::get_article))
        .route("/api/articles/:id/summarize", post(handlers::summarize_article))
        .route("/api/articles/:id/rewrite", post(handlers::rewrite_article))
        .route("/api/samples/load", post(handlers::load_samples))
        .route("/api/summaries/refresh", post(handlers::refresh_summaries))
        .route("/api/feed", get(handlers::get_feed))
        .route("/api/state", get(handlers::get_state))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(addr: SocketAddr, state: AppState) -> hn_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use hn_core::{Article, Error, Result};
}
